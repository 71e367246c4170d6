//! Color types
//!
//! Everything in the conversion pipeline works on 8-bit RGBA samples. There
//! is no color-space math: palette matching is plain Euclidean distance over
//! the raw R, G, B bytes.

mod rgba;

pub use rgba::Rgba;
