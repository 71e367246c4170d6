//! Palette types and utilities
//!
//! This module provides the fixed four-entry [`Palette`], nearest-color
//! matching, the whole-bitmap quantization and safety passes, and the error
//! types for parsing and validation.

mod error;
mod palette;
mod quantize;

pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, PALETTE_SIZE};
pub use quantize::{enforce_palette, quantize_bitmap};
