//! Unified error type for the gb-pixels public API.
//!
//! [`GbError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use crate::bitmap::BitmapError;
use crate::palette::{PaletteError, ParseColorError};
use std::fmt;

/// Unified error type for the gb-pixels public API.
///
/// # Example
///
/// ```
/// use gb_pixels::{Bitmap, Converted, Converter, GbError, Palette};
///
/// fn convert(hex: &[&str], width: usize, height: usize, rgba: Vec<u8>) -> Result<Converted, GbError> {
///     let palette = Palette::from_hex(hex)?;
///     let bitmap = Bitmap::from_raw(width, height, rgba)?;
///     Ok(Converter::new(palette).convert(bitmap))
/// }
///
/// assert!(convert(&["#000", "#fff"], 1, 1, vec![0; 4]).is_err());
/// assert!(convert(&["#000", "#555", "#aaa", "#fff"], 1, 1, vec![0; 3]).is_err());
/// ```
#[derive(Debug)]
pub enum GbError {
    /// Palette validation error (wrong size, duplicate, or parse error)
    Palette(PaletteError),
    /// Color parsing error (invalid hex string)
    ParseColor(ParseColorError),
    /// Pixel buffer does not describe a valid bitmap
    Bitmap(BitmapError),
}

impl fmt::Display for GbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GbError::Palette(err) => write!(f, "palette error: {}", err),
            GbError::ParseColor(err) => write!(f, "color parse error: {}", err),
            GbError::Bitmap(err) => write!(f, "bitmap error: {}", err),
        }
    }
}

impl std::error::Error for GbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GbError::Palette(err) => Some(err),
            GbError::ParseColor(err) => Some(err),
            GbError::Bitmap(err) => Some(err),
        }
    }
}

impl From<PaletteError> for GbError {
    fn from(err: PaletteError) -> Self {
        GbError::Palette(err)
    }
}

impl From<ParseColorError> for GbError {
    fn from(err: ParseColorError) -> Self {
        GbError::ParseColor(err)
    }
}

impl From<BitmapError> for GbError {
    fn from(err: BitmapError) -> Self {
        GbError::Bitmap(err)
    }
}
