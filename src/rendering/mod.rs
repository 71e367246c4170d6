pub mod decode;
pub mod geometry;
pub mod png_export;

use crate::error::AppError;
use gb_pixels::Bitmap;
use image::RgbaImage;

pub use decode::{
    decode_bytes, decode_file, downscale_if_needed, mime_type_for, SourceImage, MAX_INPUT_EDGE,
};
pub use geometry::{crop_rect, render_canvas, CropRect};
pub use png_export::{encode_indexed, encode_rgba, export_file_name};

/// Move an `image` buffer into a core bitmap
pub fn from_image(image: RgbaImage) -> Result<Bitmap, AppError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AppError::EmptyImage { width, height });
    }
    Ok(Bitmap::from_raw(
        width as usize,
        height as usize,
        image.into_raw(),
    )?)
}

/// Copy a core bitmap into an `image` buffer
pub fn to_image(bitmap: &Bitmap) -> Result<RgbaImage, AppError> {
    RgbaImage::from_raw(
        bitmap.width() as u32,
        bitmap.height() as u32,
        bitmap.as_bytes().to_vec(),
    )
    .ok_or_else(|| {
        AppError::InvalidArgument(format!(
            "bitmap {}x{} does not fit an image buffer",
            bitmap.width(),
            bitmap.height()
        ))
    })
}
