//! Converter builder, the primary entry point for the crate.
//!
//! [`Converter`] runs the fixed pixel pipeline: tone adjustment, dithering
//! (or plain quantization), then the palette safety pass.

use crate::bitmap::Bitmap;
use crate::dither::{apply_dither, DitherMode, DitherOptions};
use crate::output::Converted;
use crate::palette::{enforce_palette, Palette};
use crate::preprocess::{ColorAdjuster, PreprocessOptions};

/// Four-color conversion builder.
///
/// # Design
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`convert()`](Self::convert) takes `&self`, so one converter can be
///   reused across images
/// - The pipeline order is fixed: adjust, dither and quantize, safety pass
///
/// Cropping, resizing and blur happen before the bitmap reaches the
/// converter; it works at whatever size it is given.
///
/// # Example
///
/// ```
/// use gb_pixels::{Bitmap, Converter, DitherMode, Palette, Rgba};
///
/// let converter = Converter::new(Palette::dmg())
///     .contrast(20.0)
///     .dither(DitherMode::Floyd)
///     .strength(0.8);
///
/// let a = converter.convert(Bitmap::filled(16, 16, Rgba::opaque(128, 128, 128)));
/// let b = converter.convert(Bitmap::filled(16, 16, Rgba::opaque(128, 128, 128)));
///
/// // Same input, same settings, same bytes
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    palette: Palette,
    preprocess: PreprocessOptions,
    mode: DitherMode,
    dither_opts: DitherOptions,
}

impl Converter {
    /// Create a converter with neutral tone settings and dithering off.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            preprocess: PreprocessOptions::default(),
            mode: DitherMode::Off,
            dither_opts: DitherOptions::default(),
        }
    }

    /// Set brightness (roughly -100..100).
    #[inline]
    pub fn brightness(mut self, value: f32) -> Self {
        self.preprocess = self.preprocess.brightness(value);
        self
    }

    /// Set contrast (roughly -100..100).
    #[inline]
    pub fn contrast(mut self, value: f32) -> Self {
        self.preprocess = self.preprocess.contrast(value);
        self
    }

    /// Set gamma. Zero or negative values are floored, never rejected.
    #[inline]
    pub fn gamma(mut self, value: f32) -> Self {
        self.preprocess = self.preprocess.gamma(value);
        self
    }

    /// Replace all tone settings at once.
    #[inline]
    pub fn preprocess(mut self, options: PreprocessOptions) -> Self {
        self.preprocess = options;
        self
    }

    /// Select the dithering strategy.
    #[inline]
    pub fn dither(mut self, mode: DitherMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set dither strength, clamped to `[0, 1]`.
    #[inline]
    pub fn strength(mut self, strength: f32) -> Self {
        self.dither_opts = self.dither_opts.strength(strength);
        self
    }

    /// Returns the palette.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Returns the selected dither mode.
    #[inline]
    pub fn mode(&self) -> DitherMode {
        self.mode
    }

    /// Run the pipeline, consuming the bitmap.
    ///
    /// 1. Adjust brightness, contrast and gamma
    /// 2. Dither and quantize per the selected mode
    /// 3. Snap any stray pixel onto the palette and force alpha to 255
    pub fn convert(&self, mut bitmap: Bitmap) -> Converted {
        ColorAdjuster::new(self.preprocess).apply(&mut bitmap);
        apply_dither(self.mode, &mut bitmap, &self.palette, &self.dither_opts);
        let replaced = enforce_palette(&mut bitmap, &self.palette);
        Converted::new(bitmap, self.palette.clone(), replaced)
    }
}
