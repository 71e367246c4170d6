//! Crop, resize and blur: everything that happens to the source before the
//! pixel pipeline sees it.

use gb_pixels::Bitmap;
use image::imageops::{self, FilterType};

use crate::error::AppError;
use crate::models::{CropSettings, OutputSize};
use crate::rendering::{from_image, to_image};

/// Region of the source to sample, in source pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Compute the crop rectangle for a source of `src_w` x `src_h`.
///
/// The aspect comes from the crop settings, else `fallback_aspect` (usually
/// the output's), else the source's own. The largest rectangle of that aspect
/// that fits is shrunk by `zoom` and centred at `src/2 + pan*(src - crop)/2`,
/// then clamped inside the source.
pub fn crop_rect(src_w: usize, src_h: usize, crop: &CropSettings, fallback_aspect: f64) -> CropRect {
    let src_w = src_w as f64;
    let src_h = src_h as f64;

    let aspect = crop
        .aspect
        .ratio()
        .or_else(|| (fallback_aspect.is_finite() && fallback_aspect > 0.0).then_some(fallback_aspect))
        .unwrap_or(src_w / src_h);

    let mut w = src_w;
    let mut h = w / aspect;
    if h > src_h {
        h = src_h;
        w = h * aspect;
    }

    let zoom = if crop.zoom.is_finite() { (crop.zoom as f64).max(1.0) } else { 1.0 };
    w /= zoom;
    h /= zoom;

    let pan_x = (crop.pan_x as f64).clamp(-1.0, 1.0);
    let pan_y = (crop.pan_y as f64).clamp(-1.0, 1.0);
    let center_x = src_w / 2.0 + pan_x * ((src_w - w) / 2.0);
    let center_y = src_h / 2.0 + pan_y * ((src_h - h) / 2.0);

    CropRect {
        x: (center_x - w / 2.0).clamp(0.0, src_w - w),
        y: (center_y - h / 2.0).clamp(0.0, src_h - h),
        w,
        h,
    }
}

/// Cut `rect` out of the source, resize it to `size` and blur it.
///
/// Resizing is skipped when the crop already has the output size; a blur
/// radius of 0 skips the blur.
pub fn render_canvas(
    source: &Bitmap,
    rect: CropRect,
    size: OutputSize,
    blur_radius: f32,
) -> Result<Bitmap, AppError> {
    let src_w = source.width() as u32;
    let src_h = source.height() as u32;

    let x0 = (rect.x.floor().max(0.0) as u32).min(src_w - 1);
    let y0 = (rect.y.floor().max(0.0) as u32).min(src_h - 1);
    let x1 = ((rect.x + rect.w).ceil() as u32).clamp(x0 + 1, src_w);
    let y1 = ((rect.y + rect.h).ceil() as u32).clamp(y0 + 1, src_h);

    let image = to_image(source)?;
    let mut canvas = imageops::crop_imm(&image, x0, y0, x1 - x0, y1 - y0).to_image();

    if canvas.dimensions() != (size.width, size.height) {
        canvas = imageops::resize(&canvas, size.width, size.height, FilterType::Triangle);
    }

    if blur_radius > 0.0 {
        canvas = imageops::blur(&canvas, blur_radius);
    }

    from_image(canvas)
}
