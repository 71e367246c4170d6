//! Dithering strategies for four-color output.
//!
//! Two strategies are available, selected by [`DitherMode`]:
//!
//! - **Bayer**: ordered dithering. A 4×4 threshold matrix offsets each
//!   pixel independently, then a separate quantize pass runs.
//! - **Floyd-Steinberg**: error diffusion. Quantization happens inline and
//!   each pixel depends on the error left by pixels already visited, so the
//!   scan is strictly row-major, left to right, top to bottom.
//!
//! # Architecture
//!
//! Both strategies implement the [`Dither`] trait, which takes a bitmap and
//! leaves every pixel set to a palette color. [`apply_dither()`] picks the
//! strategy for a mode and falls back to plain quantization when dithering
//! is off or the strength is zero.
//!
//! # Example
//!
//! ```
//! use gb_pixels::{apply_dither, Bitmap, DitherMode, DitherOptions, Palette, Rgba};
//!
//! let palette = Palette::dmg();
//! let mut bitmap = Bitmap::filled(8, 8, Rgba::opaque(90, 140, 90));
//! apply_dither(DitherMode::Bayer, &mut bitmap, &palette, &DitherOptions::new().strength(1.0));
//!
//! assert!(bitmap.pixels().all(|p| palette.contains(p)));
//! ```

mod bayer;
mod floyd_steinberg;
mod kernel;
mod options;

pub use bayer::{BayerDither, BAYER_4X4};
pub use floyd_steinberg::FloydSteinberg;
pub use kernel::*;
pub use options::{DitherMode, DitherOptions, ParseDitherModeError};

use crate::bitmap::Bitmap;
use crate::palette::{quantize_bitmap, Palette};

/// A strategy that dithers a bitmap onto a palette.
///
/// After `dither()` returns, every pixel's RGB is one of the palette
/// entries and every alpha is 255.
pub trait Dither {
    /// Dither and quantize `bitmap` in place.
    fn dither(&self, bitmap: &mut Bitmap, palette: &Palette, options: &DitherOptions);
}

/// Run the strategy selected by `mode`.
///
/// `Off`, or a strength of zero, quantizes without dithering.
pub fn apply_dither(
    mode: DitherMode,
    bitmap: &mut Bitmap,
    palette: &Palette,
    options: &DitherOptions,
) {
    if options.is_disabled() {
        quantize_bitmap(bitmap, palette);
        return;
    }
    match mode {
        DitherMode::Off => quantize_bitmap(bitmap, palette),
        DitherMode::Bayer => BayerDither.dither(bitmap, palette, options),
        DitherMode::Floyd => FloydSteinberg.dither(bitmap, palette, options),
    }
}

/// Error buffer for error diffusion.
///
/// Keeps a sliding window of error rows, only as many as the kernel can
/// reach (`max_dy + 1`), instead of a full-image plane per channel.
///
/// # Usage Pattern
///
/// 1. Create buffer with `new(width, row_depth)`
/// 2. For each row:
///    a. Read accumulated error with `get_accumulated(x)`
///    b. After processing pixel, distribute error with `add_error(x, dy, error)`
///    c. After row complete, call `advance_row()`
#[derive(Debug)]
pub struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next, etc.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a zeroed buffer of `row_depth` rows.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Error accumulated so far for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a pixel `row_offset` rows below the current one.
    ///
    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Advance to the next row.
    ///
    /// The first row is discarded, the rest shift forward, and a zeroed row
    /// is added at the end.
    pub fn advance_row(&mut self) {
        // Rotate left: [0,1,2] -> [1,2,0]
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Error diffusion loop shared by kernel-based strategies.
///
/// Each pixel gets its accumulated error added and clamped to `[0, 255]`,
/// is replaced by the nearest palette entry, and then sends
/// `(clamped - chosen) * strength` to its neighbors per `kernel`.
pub(crate) fn dither_with_kernel(
    bitmap: &mut Bitmap,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
) {
    let width = bitmap.width();
    let height = bitmap.height();
    let strength = options.strength;
    let divisor = kernel.divisor as f32;

    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);

    for y in 0..height {
        for x in 0..width {
            let src = bitmap.pixel(x, y);
            let accumulated = error_buf.get_accumulated(x);
            let pixel = [
                (src.r as f32 + accumulated[0]).clamp(0.0, 255.0),
                (src.g as f32 + accumulated[1]).clamp(0.0, 255.0),
                (src.b as f32 + accumulated[2]).clamp(0.0, 255.0),
            ];

            let (nearest_idx, _) = palette.find_nearest(pixel);
            let nearest = palette.color(nearest_idx);
            bitmap.set_pixel(x, y, nearest);

            let error = [
                (pixel[0] - nearest.r as f32) * strength,
                (pixel[1] - nearest.g as f32) * strength,
                (pixel[2] - nearest.b as f32) * strength,
            ];

            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                let ny = y + dy as usize;
                if nx < 0 || nx as usize >= width || ny >= height {
                    continue;
                }
                let w = weight as f32 / divisor;
                error_buf.add_error(
                    nx as usize,
                    dy as usize,
                    [error[0] * w, error[1] * w, error[2] * w],
                );
            }
        }
        error_buf.advance_row();
    }
}
