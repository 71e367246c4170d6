//! Tone adjustment applied before dithering.
//!
//! Each of R, G, B is passed through the same curve; alpha is untouched:
//!
//! 1. **Contrast and brightness** - `f * (v - 128) + 128 + brightness * 2.55`
//!    with `f = 259 * (contrast + 255) / (255 * (259 - contrast))`, clamped
//! 2. **Gamma** - `255 * (v / 255) ^ (1 / gamma)`, clamped and rounded
//!    half to even
//!
//! The order is fixed. Running gamma first gives a different result.
//!
//! # Example
//!
//! ```
//! use gb_pixels::{Bitmap, ColorAdjuster, PreprocessOptions, Rgba};
//!
//! let adjuster = ColorAdjuster::new(PreprocessOptions::new().brightness(20.0));
//! let mut bitmap = Bitmap::filled(2, 2, Rgba::opaque(100, 100, 100));
//! adjuster.apply(&mut bitmap);
//!
//! // 100 + 20 * 2.55 = 151
//! assert_eq!(bitmap.pixel(0, 0), Rgba::opaque(151, 151, 151));
//! ```

mod adjuster;
mod options;

pub use adjuster::ColorAdjuster;
pub use options::PreprocessOptions;
