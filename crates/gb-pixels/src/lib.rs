#![allow(clippy::module_inception)]

//! gb-pixels: four-color conversion and tile-budget checks for retro
//! console graphics
//!
//! This library turns arbitrary RGBA bitmaps into images that use exactly
//! four palette colors, and validates finished images against the tile
//! limits of the target hardware.
//!
//! # Quick Start
//!
//! The [`Converter`] builder is the entry point for conversion:
//!
//! ```
//! use gb_pixels::{Bitmap, Converter, DitherMode, Palette, Rgba};
//!
//! let converter = Converter::new(Palette::dmg())
//!     .brightness(10.0)
//!     .dither(DitherMode::Bayer)
//!     .strength(0.5);
//!
//! let source = Bitmap::filled(160, 144, Rgba::opaque(200, 120, 40));
//! let converted = converter.convert(source);
//!
//! assert_eq!(converted.width(), 160);
//! assert!(converted.bitmap().pixels().all(|p| converted.palette().contains(p)));
//! ```
//!
//! # Tile Validation
//!
//! ```
//! use gb_pixels::{Bitmap, Palette, Rgba, TileAnalyzer, TileGridNormalizer, TilesetAssembler};
//!
//! let image = Bitmap::filled(160, 144, Palette::dmg().color(3));
//! let grid = TileGridNormalizer::default().normalize(&image);
//! let analysis = TileAnalyzer::default().analyze(&grid);
//!
//! assert_eq!(analysis.total_tiles, 20 * 18);
//! assert_eq!(analysis.unique_tiles, 1);
//! assert!(analysis.status.is_ok());
//!
//! let strip = TilesetAssembler::default().assemble(&analysis);
//! assert_eq!((strip.width(), strip.height()), (128, 8));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGBA bitmap             (decoded, cropped and resized by the caller)
//!     |
//!     v
//! [ColorAdjuster]         contrast + brightness, clamp, gamma, clamp
//!     |
//!     v
//! [DitherMode]
//!     off    -> quantize
//!     bayer  -> threshold offsets -> quantize
//!     floyd  -> error diffusion with inline quantize
//!     |
//!     v
//! [enforce_palette]       snap stray pixels, force alpha 255
//!     |
//!     v
//! Converted               every pixel is a palette entry
//! ```
//!
//! ## Matching
//!
//! Nearest-color search is plain squared Euclidean distance over R, G and B
//! bytes. When two entries are equally close the one declared first wins,
//! so the result never depends on iteration order. With the default palette
//! pure red `(255, 0, 0)` is at distances 63169, 60065, 63169 and 105314 from
//! the four greens and maps to `#306850`.
//!
//! ## Determinism
//!
//! Every stage is a pure function of its input bitmap and options. Running
//! the same bitmap through the same [`Converter`] twice yields identical
//! bytes, and the same holds for [`TileAnalyzer`].
//!
//! ## Scan Order
//!
//! Floyd-Steinberg processes pixels strictly left to right, top to bottom;
//! each pixel sees the error of pixels already visited. Bayer dithering,
//! quantization and tile keying have no cross-pixel dependency.

pub mod api;
pub mod bitmap;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;
pub mod preprocess;
pub mod tiles;


pub use api::{Converter, GbError};
pub use bitmap::{Bitmap, BitmapError};
pub use color::Rgba;
pub use dither::{
    apply_dither, BayerDither, Dither, DitherMode, DitherOptions, FloydSteinberg,
    ParseDitherModeError,
};
pub use output::Converted;
pub use palette::{
    enforce_palette, quantize_bitmap, Palette, PaletteError, ParseColorError, PALETTE_SIZE,
};
pub use preprocess::{ColorAdjuster, PreprocessOptions};
pub use tiles::{
    ColorCount, GridMode, NormalizeOptions, NormalizedGrid, ParseModeError, TileAnalysis,
    TileAnalyzer, TileEntry, TileGridNormalizer, TileKey, TileSort, TileStatus,
    TilesetAssembler, TransparencyMode, DEFAULT_BACKGROUND, DEFAULT_COLUMNS,
    DEFAULT_TILE_LIMIT, DEFAULT_TILE_SIZE, MAX_COLUMNS, MAX_TILE_SIZE, TOP_COLORS,
};
