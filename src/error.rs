use gb_pixels::{BitmapError, GbError, PaletteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Image has no pixels: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Bitmap error: {0}")]
    Bitmap(#[from] BitmapError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<GbError> for AppError {
    fn from(e: GbError) -> Self {
        match e {
            GbError::Palette(e) => AppError::Palette(e),
            GbError::ParseColor(e) => AppError::Palette(PaletteError::ParseColor(e)),
            GbError::Bitmap(e) => AppError::Bitmap(e),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::Decode(e.to_string())
    }
}

impl From<png::EncodingError> for AppError {
    fn from(e: png::EncodingError) -> Self {
        AppError::PngEncode(e.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_decode() {
        let error = AppError::Decode("not an image".to_string());
        assert_eq!(error.to_string(), "Decode error: not an image");
    }

    #[test]
    fn test_app_error_empty_image() {
        let error = AppError::EmptyImage {
            width: 0,
            height: 12,
        };
        assert_eq!(error.to_string(), "Image has no pixels: 0x12");
    }

    #[test]
    fn test_app_error_invalid_argument() {
        let error = AppError::InvalidArgument("bad size".to_string());
        assert_eq!(error.to_string(), "Invalid argument: bad size");
    }

    #[test]
    fn test_app_error_from_palette_error() {
        let error: AppError = PaletteError::WrongSize {
            expected: 4,
            actual: 3,
        }
        .into();
        match error {
            AppError::Palette(_) => {}
            _ => panic!("Expected Palette variant"),
        }
        assert!(error.to_string().starts_with("Palette error: "));
    }

    #[test]
    fn test_app_error_from_gb_error() {
        let gb = GbError::Bitmap(BitmapError::ZeroDimension {
            width: 0,
            height: 0,
        });
        let error: AppError = gb.into();
        match error {
            AppError::Bitmap(_) => {}
            _ => panic!("Expected Bitmap variant"),
        }
    }

    #[test]
    fn test_app_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: AppError = io.into();
        assert_eq!(error.to_string(), "IO error: missing");
    }
}
