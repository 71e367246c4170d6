//! Error type for bitmap construction.

use std::fmt;

/// Error returned when a pixel buffer cannot form a valid [`Bitmap`](super::Bitmap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitmapError {
    /// Width or height is zero
    ZeroDimension {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// Byte size of the requested dimensions overflows `usize`
    TooLarge {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// Buffer length is not `width * height * 4`
    LengthMismatch {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        actual: usize,
    },
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitmapError::ZeroDimension { width, height } => {
                write!(f, "bitmap has zero dimension ({}x{})", width, height)
            }
            BitmapError::TooLarge { width, height } => {
                write!(f, "bitmap too large ({}x{})", width, height)
            }
            BitmapError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for BitmapError {}
