use std::path::Path;

use gb_pixels::Bitmap;
use image::imageops::{self, FilterType};

use crate::error::AppError;
use crate::rendering::{from_image, to_image};

/// Longest edge accepted before the source is shrunk
pub const MAX_INPUT_EDGE: usize = 4096;

/// A decoded input image plus what reports need to know about it
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub file_name: String,
    pub mime_type: &'static str,
    /// Size as decoded, before any downscaling
    pub src_width: usize,
    pub src_height: usize,
    pub bitmap: Bitmap,
}

impl SourceImage {
    /// Decode `path`, shrinking it to [`MAX_INPUT_EDGE`] if needed
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let decoded = decode_file(path)?;
        let (src_width, src_height) = (decoded.width(), decoded.height());
        let bitmap = downscale_if_needed(decoded, MAX_INPUT_EDGE)?;

        tracing::debug!(
            path = %path.display(),
            src_width,
            src_height,
            "Decoded source image"
        );

        Ok(Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mime_type: mime_type_for(path),
            src_width,
            src_height,
            bitmap,
        })
    }
}

/// MIME type guessed from the file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Decode an image file (PNG, JPEG, GIF, BMP) into RGBA8
pub fn decode_file(path: &Path) -> Result<Bitmap, AppError> {
    let bytes = std::fs::read(path)?;
    decode_bytes(&bytes)
}

/// Decode in-memory image data into RGBA8
pub fn decode_bytes(bytes: &[u8]) -> Result<Bitmap, AppError> {
    let image = image::load_from_memory(bytes)?;
    from_image(image.to_rgba8())
}

/// Shrink the bitmap proportionally when its longest edge exceeds `max_edge`.
///
/// New sides are `round(side * ratio)`, at least 1.
pub fn downscale_if_needed(bitmap: Bitmap, max_edge: usize) -> Result<Bitmap, AppError> {
    let longest = bitmap.width().max(bitmap.height());
    if longest <= max_edge {
        return Ok(bitmap);
    }

    let ratio = max_edge as f64 / longest as f64;
    let width = ((bitmap.width() as f64 * ratio).round() as u32).max(1);
    let height = ((bitmap.height() as f64 * ratio).round() as u32).max(1);

    tracing::warn!(
        src_width = bitmap.width(),
        src_height = bitmap.height(),
        width,
        height,
        "Input too large, downscaling"
    );

    let image = to_image(&bitmap)?;
    from_image(imageops::resize(&image, width, height, FilterType::Triangle))
}
