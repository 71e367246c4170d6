//! Tile deduplication and budget checks.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::normalize::{effective_tile_size, NormalizedGrid, DEFAULT_TILE_SIZE};
use super::ParseModeError;
use crate::bitmap::Bitmap;
use crate::color::Rgba;
use crate::palette::PALETTE_SIZE;

/// Distinct-tile budget used when none (or zero) is given.
pub const DEFAULT_TILE_LIMIT: usize = 192;

/// Number of entries [`TileAnalysis::top_colors()`] returns by default.
pub const TOP_COLORS: usize = 16;

/// Identity of a tile: its RGBA bytes in raster order.
///
/// Equality and hashing use the full byte sequence, so two tiles share a key
/// only if every byte matches. Arrangement matters; a flipped tile is a
/// different key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey(Box<[u8]>);

impl TileKey {
    /// Key for the `size × size` tile whose top-left pixel is `(x0, y0)`.
    pub fn from_bitmap(bitmap: &Bitmap, x0: usize, y0: usize, size: usize) -> Self {
        Self(bitmap.block_bytes(x0, y0, size).into_boxed_slice())
    }

    /// The tile's RGBA bytes in raster order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Pass/fail verdict against the palette and tile budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileStatus {
    /// Within both limits.
    Ok,
    /// More than four distinct colors.
    PaletteNg,
    /// More distinct tiles than the budget.
    TilesOver,
    /// Both limits exceeded.
    Both,
}

impl TileStatus {
    /// Derive the status from the two checks.
    pub fn from_checks(palette_ok: bool, tiles_ok: bool) -> Self {
        match (palette_ok, tiles_ok) {
            (false, false) => TileStatus::Both,
            (false, true) => TileStatus::PaletteNg,
            (true, false) => TileStatus::TilesOver,
            (true, true) => TileStatus::Ok,
        }
    }

    /// The report name: `OK`, `PALETTE_NG`, `TILES_OVER` or `BOTH`.
    pub fn as_str(self) -> &'static str {
        match self {
            TileStatus::Ok => "OK",
            TileStatus::PaletteNg => "PALETTE_NG",
            TileStatus::TilesOver => "TILES_OVER",
            TileStatus::Both => "BOTH",
        }
    }

    /// True only for [`TileStatus::Ok`].
    #[inline]
    pub fn is_ok(self) -> bool {
        self == TileStatus::Ok
    }
}

impl fmt::Display for TileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileStatus {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(TileStatus::Ok),
            "PALETTE_NG" => Ok(TileStatus::PaletteNg),
            "TILES_OVER" => Ok(TileStatus::TilesOver),
            "BOTH" => Ok(TileStatus::Both),
            _ => Err(ParseModeError {
                kind: "tile status",
                value: s.to_string(),
            }),
        }
    }
}

/// One distinct tile and where it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEntry {
    /// Content key.
    pub key: TileKey,
    /// Number of grid cells with this content.
    pub count: usize,
    /// Grid positions (`ty * tiles_x + tx`) in row-major order.
    pub positions: Vec<usize>,
}

/// An exact RGBA color and how many pixels have it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
    /// The color, alpha included.
    pub rgba: Rgba,
    /// Pixel count.
    pub count: usize,
}

/// Result of [`TileAnalyzer::analyze()`].
///
/// Built once per analyzed bitmap and never mutated; re-analyze to reflect
/// new parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileAnalysis {
    /// Width that was analyzed (a multiple of `tile_size`).
    pub analyzed_width: usize,
    /// Height that was analyzed (a multiple of `tile_size`).
    pub analyzed_height: usize,
    /// Tile edge in pixels.
    pub tile_size: usize,
    /// Tiles per row.
    pub tiles_x: usize,
    /// Tiles per column.
    pub tiles_y: usize,
    /// `tiles_x * tiles_y`.
    pub total_tiles: usize,
    /// Distinct exact RGBA values over the whole image.
    pub unique_colors: usize,
    /// Distinct tile keys.
    pub unique_tiles: usize,
    /// Distinct tiles that occur exactly once.
    pub rare_unique_tiles: usize,
    /// `unique_colors <= 4`.
    pub palette_ok: bool,
    /// `unique_tiles <= tile_limit`.
    pub tiles_ok: bool,
    /// Distinct-tile budget the image was checked against.
    pub tile_limit: usize,
    /// Overall verdict.
    pub status: TileStatus,
    /// Distinct tiles in order of first appearance.
    pub tiles: Vec<TileEntry>,
    /// For each grid cell in row-major order, its index into `tiles`.
    pub tile_index_by_pos: Vec<usize>,
    /// Every distinct color in order of first appearance.
    pub color_counts: Vec<ColorCount>,
}

impl TileAnalysis {
    /// The `n` most frequent colors, highest count first. Equal counts keep
    /// first-appearance order.
    pub fn top_colors(&self, n: usize) -> Vec<ColorCount> {
        let mut colors = self.color_counts.clone();
        colors.sort_by(|a, b| b.count.cmp(&a.count));
        colors.truncate(n);
        colors
    }

    /// Entry for the tile at grid cell `(tx, ty)`.
    pub fn tile_at(&self, tx: usize, ty: usize) -> Option<&TileEntry> {
        if tx >= self.tiles_x || ty >= self.tiles_y {
            return None;
        }
        self.tile_index_by_pos
            .get(ty * self.tiles_x + tx)
            .and_then(|&i| self.tiles.get(i))
    }

    /// Grid positions of tiles that occur exactly once.
    pub fn rare_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .tiles
            .iter()
            .filter(|t| t.count == 1)
            .flat_map(|t| t.positions.iter().copied())
            .collect();
        positions.sort_unstable();
        positions
    }
}

/// Splits a grid into tiles and checks it against the console limits.
///
/// # Example
///
/// ```
/// use gb_pixels::{Bitmap, Rgba, TileAnalyzer, TileGridNormalizer, TileStatus};
///
/// // 8×8 image with five colors: one tile, too many colors
/// let mut image = Bitmap::filled(8, 8, Rgba::opaque(0, 0, 0));
/// for i in 1..5 {
///     image.set_pixel(i, 0, Rgba::opaque(i as u8 * 40, 0, 0));
/// }
/// let grid = TileGridNormalizer::default().normalize(&image);
/// let analysis = TileAnalyzer::new(8, 1).analyze(&grid);
///
/// assert_eq!(analysis.unique_tiles, 1);
/// assert_eq!(analysis.unique_colors, 5);
/// assert_eq!(analysis.status, TileStatus::PaletteNg);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAnalyzer {
    tile_size: usize,
    tile_limit: usize,
}

impl Default for TileAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE, DEFAULT_TILE_LIMIT)
    }
}

impl TileAnalyzer {
    /// Create an analyzer. Zero tile size or limit takes the default, and
    /// the tile size is clamped to [`MAX_TILE_SIZE`](super::MAX_TILE_SIZE).
    ///
    /// `tile_size` only applies to [`analyze_bitmap()`](Self::analyze_bitmap).
    /// [`analyze()`](Self::analyze) always uses the tile size the grid was
    /// normalized with.
    pub fn new(tile_size: usize, tile_limit: usize) -> Self {
        Self {
            tile_size: effective_tile_size(tile_size),
            tile_limit: if tile_limit == 0 {
                DEFAULT_TILE_LIMIT
            } else {
                tile_limit
            },
        }
    }

    /// Tile edge in use.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Budget in use.
    pub fn tile_limit(&self) -> usize {
        self.tile_limit
    }

    /// Analyze a normalized grid.
    ///
    /// The grid's tile size wins over this analyzer's own, since the grid's
    /// sides are only guaranteed to be multiples of the size it was built
    /// with.
    pub fn analyze(&self, grid: &NormalizedGrid) -> TileAnalysis {
        Self::new(grid.tile_size(), self.tile_limit).analyze_bitmap(grid.bitmap())
    }

    /// Analyze a bitmap directly.
    ///
    /// Partial tiles at the right and bottom edges are ignored for tile
    /// counting but their pixels still count toward colors.
    pub fn analyze_bitmap(&self, bitmap: &Bitmap) -> TileAnalysis {
        let t = self.tile_size;
        let tiles_x = bitmap.width() / t;
        let tiles_y = bitmap.height() / t;
        let total_tiles = tiles_x * tiles_y;

        let mut color_index: HashMap<Rgba, usize> = HashMap::new();
        let mut color_counts: Vec<ColorCount> = Vec::new();
        for rgba in bitmap.pixels() {
            match color_index.get(&rgba) {
                Some(&i) => color_counts[i].count += 1,
                None => {
                    color_index.insert(rgba, color_counts.len());
                    color_counts.push(ColorCount { rgba, count: 1 });
                }
            }
        }

        let mut tile_index: HashMap<TileKey, usize> = HashMap::new();
        let mut tiles: Vec<TileEntry> = Vec::new();
        let mut tile_index_by_pos = Vec::with_capacity(total_tiles);
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let pos = ty * tiles_x + tx;
                let key = TileKey::from_bitmap(bitmap, tx * t, ty * t, t);
                let idx = match tile_index.get(&key) {
                    Some(&i) => i,
                    None => {
                        let i = tiles.len();
                        tile_index.insert(key.clone(), i);
                        tiles.push(TileEntry {
                            key,
                            count: 0,
                            positions: Vec::new(),
                        });
                        i
                    }
                };
                tiles[idx].count += 1;
                tiles[idx].positions.push(pos);
                tile_index_by_pos.push(idx);
            }
        }

        let unique_colors = color_counts.len();
        let unique_tiles = tiles.len();
        let rare_unique_tiles = tiles.iter().filter(|t| t.count == 1).count();
        let palette_ok = unique_colors <= PALETTE_SIZE;
        let tiles_ok = unique_tiles <= self.tile_limit;

        TileAnalysis {
            analyzed_width: bitmap.width(),
            analyzed_height: bitmap.height(),
            tile_size: t,
            tiles_x,
            tiles_y,
            total_tiles,
            unique_colors,
            unique_tiles,
            rare_unique_tiles,
            palette_ok,
            tiles_ok,
            tile_limit: self.tile_limit,
            status: TileStatus::from_checks(palette_ok, tiles_ok),
            tiles,
            tile_index_by_pos,
            color_counts,
        }
    }
}
