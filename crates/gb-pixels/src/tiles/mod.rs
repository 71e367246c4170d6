//! Tile-grid validation.
//!
//! The target console stores graphics as fixed-size tiles (8×8 by default)
//! and can only hold so many distinct ones. This module checks an exported
//! image against those limits:
//!
//! 1. [`TileGridNormalizer`] pads or crops the image to whole tiles and
//!    resolves transparency to an opaque background
//! 2. [`TileAnalyzer`] splits it into tiles, deduplicates them by exact
//!    content, counts colors, and derives a [`TileStatus`]
//! 3. [`TilesetAssembler`] lays the distinct tiles out in one strip image
//!
//! # Example
//!
//! ```
//! use gb_pixels::{Bitmap, Rgba, TileAnalyzer, TileGridNormalizer, TileStatus};
//!
//! let image = Bitmap::filled(20, 12, Rgba::opaque(0x30, 0x68, 0x50));
//! let grid = TileGridNormalizer::default().normalize(&image);
//! assert_eq!((grid.width(), grid.height()), (24, 16));
//!
//! let analysis = TileAnalyzer::default().analyze(&grid);
//! assert_eq!(analysis.total_tiles, 6);
//! assert_eq!(analysis.status, TileStatus::Ok);
//! ```

mod analyze;
mod normalize;
mod tileset;

pub use analyze::{
    ColorCount, TileAnalysis, TileAnalyzer, TileEntry, TileKey, TileStatus, DEFAULT_TILE_LIMIT,
    TOP_COLORS,
};
pub use normalize::{
    GridMode, NormalizeOptions, NormalizedGrid, TileGridNormalizer, TransparencyMode,
    DEFAULT_BACKGROUND, DEFAULT_TILE_SIZE, MAX_TILE_SIZE,
};
pub use tileset::{TileSort, TilesetAssembler, DEFAULT_COLUMNS, MAX_COLUMNS};

use std::fmt;

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    /// What was being parsed, e.g. "grid mode"
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseModeError {}
