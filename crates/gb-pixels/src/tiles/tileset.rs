//! Packing distinct tiles into one strip image.

use std::fmt;
use std::str::FromStr;

use super::analyze::{TileAnalysis, TileEntry};
use super::ParseModeError;
use crate::bitmap::Bitmap;
use crate::color::Rgba;

/// Columns used when none (or zero) is given.
pub const DEFAULT_COLUMNS: usize = 16;

/// Widest strip accepted, in tiles; bigger values are clamped to it.
pub const MAX_COLUMNS: usize = 256;

/// Order of tiles in the strip, by occurrence count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileSort {
    /// Least frequent first, so one-off tiles lead.
    #[default]
    Asc,
    /// Most frequent first.
    Desc,
}

impl TileSort {
    /// The lowercase name used in settings.
    pub fn as_str(self) -> &'static str {
        match self {
            TileSort::Asc => "asc",
            TileSort::Desc => "desc",
        }
    }
}

impl fmt::Display for TileSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileSort {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "freqasc" => Ok(TileSort::Asc),
            "desc" | "freqdesc" => Ok(TileSort::Desc),
            _ => Err(ParseModeError {
                kind: "tile sort",
                value: s.to_string(),
            }),
        }
    }
}

/// Lays the distinct tiles of an analysis out in a grid.
///
/// Cells are filled left to right, top to bottom, in sort order; equal
/// counts keep the order in which the tiles were first seen. Unused cells
/// in the last row stay transparent black.
///
/// # Example
///
/// ```
/// use gb_pixels::{Bitmap, Rgba, TileAnalyzer, TilesetAssembler, TileSort};
///
/// let mut image = Bitmap::filled(24, 8, Rgba::opaque(0, 0, 0));
/// image.set_pixel(8, 0, Rgba::opaque(255, 255, 255));
/// let analysis = TileAnalyzer::default().analyze_bitmap(&image);
///
/// let strip = TilesetAssembler::new(4, TileSort::Asc).assemble(&analysis);
/// assert_eq!((strip.width(), strip.height()), (32, 8));
/// // the one-off tile comes first
/// assert_eq!(strip.pixel(0, 0), Rgba::opaque(255, 255, 255));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilesetAssembler {
    columns: usize,
    sort: TileSort,
}

impl Default for TilesetAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, TileSort::Asc)
    }
}

impl TilesetAssembler {
    /// Create an assembler. Zero columns takes the default; more than
    /// [`MAX_COLUMNS`] is clamped.
    pub fn new(columns: usize, sort: TileSort) -> Self {
        Self {
            columns: match columns {
                0 => DEFAULT_COLUMNS,
                n => n.min(MAX_COLUMNS),
            },
            sort,
        }
    }

    /// Column count in use.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Distinct tiles in strip order.
    pub fn ordered<'a>(&self, analysis: &'a TileAnalysis) -> Vec<&'a TileEntry> {
        let mut entries: Vec<&TileEntry> = analysis.tiles.iter().collect();
        match self.sort {
            TileSort::Asc => entries.sort_by_key(|e| e.count),
            TileSort::Desc => entries.sort_by(|a, b| b.count.cmp(&a.count)),
        }
        entries
    }

    /// Strip dimensions for `tile_count` tiles of edge `tile_size`.
    pub fn strip_size(&self, tile_count: usize, tile_size: usize) -> (usize, usize) {
        let rows = tile_count.div_ceil(self.columns).max(1);
        (self.columns * tile_size, rows * tile_size)
    }

    /// Compose the strip image.
    pub fn assemble(&self, analysis: &TileAnalysis) -> Bitmap {
        let t = analysis.tile_size;
        let (width, height) = self.strip_size(analysis.tiles.len(), t);
        let mut strip = Bitmap::blank(width, height);

        for (i, entry) in self.ordered(analysis).into_iter().enumerate() {
            let dx = (i % self.columns) * t;
            let dy = (i / self.columns) * t;
            let row_bytes = t * 4;
            for (row, chunk) in entry.key.as_bytes().chunks_exact(row_bytes).enumerate() {
                for (col, px) in chunk.chunks_exact(4).enumerate() {
                    strip.set_pixel(dx + col, dy + row, Rgba::new(px[0], px[1], px[2], px[3]));
                }
            }
        }
        strip
    }
}
