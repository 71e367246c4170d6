//! Padding or cropping to a whole number of tiles.

use std::fmt;
use std::str::FromStr;

use super::ParseModeError;
use crate::bitmap::Bitmap;
use crate::color::Rgba;

/// Tile edge used when none (or zero) is given.
pub const DEFAULT_TILE_SIZE: usize = 8;

/// Largest tile edge accepted; bigger values are clamped to it.
pub const MAX_TILE_SIZE: usize = 256;

/// Fill color for padding and for resolved transparent pixels: the
/// lightest shade of the default palette.
pub const DEFAULT_BACKGROUND: Rgba = Rgba::opaque(224, 248, 207);

/// How to reach a multiple of the tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridMode {
    /// Grow each side up to the next multiple; new area is background.
    #[default]
    Pad,
    /// Shrink each side down to the previous multiple, never below one tile.
    Crop,
}

impl GridMode {
    /// The lowercase name used in settings and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            GridMode::Pad => "pad",
            GridMode::Crop => "crop",
        }
    }

    /// Output length of one side of `len` pixels.
    pub fn snap(self, len: usize, tile_size: usize) -> usize {
        match self {
            GridMode::Pad => len.div_ceil(tile_size) * tile_size,
            GridMode::Crop => (len / tile_size * tile_size).max(tile_size),
        }
    }
}

impl fmt::Display for GridMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pad" => Ok(GridMode::Pad),
            "crop" => Ok(GridMode::Crop),
            _ => Err(ParseModeError {
                kind: "grid mode",
                value: s.to_string(),
            }),
        }
    }
}

/// How pixels with alpha below 255 are resolved.
///
/// Both modes currently produce the same pixels: RGB becomes the background
/// and alpha becomes 255. They differ only in what is recorded in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransparencyMode {
    /// Replace with the background color.
    #[default]
    Replace,
    /// Treat as color 0 of the exported tile data.
    Color0,
}

impl TransparencyMode {
    /// The lowercase name used in settings and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            TransparencyMode::Replace => "replace",
            TransparencyMode::Color0 => "color0",
        }
    }
}

impl fmt::Display for TransparencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransparencyMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(TransparencyMode::Replace),
            "color0" => Ok(TransparencyMode::Color0),
            _ => Err(ParseModeError {
                kind: "transparency mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Options for [`TileGridNormalizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Tile edge in pixels. 0 means [`DEFAULT_TILE_SIZE`]; values above
    /// [`MAX_TILE_SIZE`] are clamped.
    pub tile_size: usize,
    /// Pad or crop.
    pub mode: GridMode,
    /// Fill and transparency replacement color. Its alpha is ignored.
    pub background: Rgba,
    /// Transparency handling.
    pub transparency: TransparencyMode,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            mode: GridMode::Pad,
            background: DEFAULT_BACKGROUND,
            transparency: TransparencyMode::Replace,
        }
    }
}

impl NormalizeOptions {
    /// Create default options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile size.
    #[inline]
    pub fn tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set pad or crop.
    #[inline]
    pub fn mode(mut self, mode: GridMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the background color.
    #[inline]
    pub fn background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    /// Set the transparency mode.
    #[inline]
    pub fn transparency(mut self, transparency: TransparencyMode) -> Self {
        self.transparency = transparency;
        self
    }

    /// The tile size actually used.
    #[inline]
    pub fn effective_tile_size(&self) -> usize {
        effective_tile_size(self.tile_size)
    }
}

/// Map a requested tile edge into `1..=MAX_TILE_SIZE`, with 0 meaning the
/// default.
pub(crate) fn effective_tile_size(tile_size: usize) -> usize {
    match tile_size {
        0 => DEFAULT_TILE_SIZE,
        t => t.min(MAX_TILE_SIZE),
    }
}

/// A bitmap whose sides are whole multiples of the tile size, plus the
/// dimensions it was made from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGrid {
    bitmap: Bitmap,
    tile_size: usize,
    src_width: usize,
    src_height: usize,
    transparency: TransparencyMode,
    resolved_pixels: usize,
}

impl NormalizedGrid {
    /// The normalized pixels. Every alpha is 255.
    #[inline]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Consume, returning the normalized pixels.
    #[inline]
    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }

    /// Normalized width.
    #[inline]
    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    /// Normalized height.
    #[inline]
    pub fn height(&self) -> usize {
        self.bitmap.height()
    }

    /// Tile edge the grid was built for.
    #[inline]
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Width before normalization.
    #[inline]
    pub fn src_width(&self) -> usize {
        self.src_width
    }

    /// Height before normalization.
    #[inline]
    pub fn src_height(&self) -> usize {
        self.src_height
    }

    /// The transparency mode that was applied.
    #[inline]
    pub fn transparency(&self) -> TransparencyMode {
        self.transparency
    }

    /// How many copied pixels had alpha below 255 and were resolved.
    #[inline]
    pub fn resolved_pixels(&self) -> usize {
        self.resolved_pixels
    }
}

/// Pads or crops a bitmap to the tile grid.
///
/// The output canvas is filled with the background, the source is copied in
/// at the origin (clipped to the canvas), and then every pixel with alpha
/// below 255 gets the background RGB and alpha 255. Pixels are copied as
/// is, not blended, so a translucent source pixel is replaced outright.
///
/// # Example
///
/// ```
/// use gb_pixels::{Bitmap, GridMode, NormalizeOptions, Rgba, TileGridNormalizer};
///
/// let image = Bitmap::filled(17, 9, Rgba::opaque(0, 0, 0));
///
/// let padded = TileGridNormalizer::default().normalize(&image);
/// assert_eq!((padded.width(), padded.height()), (24, 16));
///
/// let cropped = TileGridNormalizer::new(NormalizeOptions::new().mode(GridMode::Crop))
///     .normalize(&image);
/// assert_eq!((cropped.width(), cropped.height()), (16, 8));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TileGridNormalizer {
    options: NormalizeOptions,
}

impl TileGridNormalizer {
    /// Create a normalizer. A zero tile size is replaced by the default and
    /// an oversized one is clamped to [`MAX_TILE_SIZE`].
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options: NormalizeOptions {
                tile_size: options.effective_tile_size(),
                ..options
            },
        }
    }

    /// The options in effect.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Output dimensions for a source of the given size.
    pub fn target_size(&self, width: usize, height: usize) -> (usize, usize) {
        let t = self.options.tile_size;
        (
            self.options.mode.snap(width, t),
            self.options.mode.snap(height, t),
        )
    }

    /// Build the normalized grid.
    pub fn normalize(&self, source: &Bitmap) -> NormalizedGrid {
        let background = self.options.background.to_opaque();
        let (width, height) = self.target_size(source.width(), source.height());

        let mut bitmap = Bitmap::filled(width, height, background);
        bitmap.blit(source, 0, 0, source.width(), source.height(), 0, 0);

        let mut resolved_pixels = 0;
        let bg = background.rgb();
        for px in bitmap.pixels_mut() {
            if px[3] < 255 {
                // Replace and Color0 resolve identically.
                px[..3].copy_from_slice(&bg);
                px[3] = 255;
                resolved_pixels += 1;
            }
        }

        NormalizedGrid {
            bitmap,
            tile_size: self.options.tile_size,
            src_width: source.width(),
            src_height: source.height(),
            transparency: self.options.transparency,
            resolved_pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap() {
        assert_eq!(GridMode::Pad.snap(17, 8), 24);
        assert_eq!(GridMode::Pad.snap(16, 8), 16);
        assert_eq!(GridMode::Pad.snap(1, 8), 8);
        assert_eq!(GridMode::Crop.snap(17, 8), 16);
        assert_eq!(GridMode::Crop.snap(16, 8), 16);
        assert_eq!(GridMode::Crop.snap(5, 8), 8);
    }

    #[test]
    fn test_pad_fills_background() {
        let red = Rgba::opaque(255, 0, 0);
        let grid = TileGridNormalizer::default().normalize(&Bitmap::filled(10, 3, red));
        assert_eq!((grid.width(), grid.height()), (16, 8));
        assert_eq!((grid.src_width(), grid.src_height()), (10, 3));
        assert_eq!(grid.bitmap().pixel(9, 2), red);
        assert_eq!(grid.bitmap().pixel(10, 2), DEFAULT_BACKGROUND);
        assert_eq!(grid.bitmap().pixel(0, 3), DEFAULT_BACKGROUND);
        assert_eq!(grid.resolved_pixels(), 0);
    }

    #[test]
    fn test_crop_drops_outside() {
        let mut image = Bitmap::filled(10, 10, Rgba::opaque(0, 0, 0));
        image.set_pixel(9, 9, Rgba::opaque(255, 255, 255));
        let normalizer = TileGridNormalizer::new(NormalizeOptions::new().mode(GridMode::Crop));
        let grid = normalizer.normalize(&image);
        assert_eq!((grid.width(), grid.height()), (8, 8));
        assert!(grid.bitmap().pixels().all(|p| p == Rgba::opaque(0, 0, 0)));
    }

    #[test]
    fn test_crop_smaller_than_tile_pads() {
        let image = Bitmap::filled(3, 3, Rgba::opaque(0, 0, 0));
        let grid = TileGridNormalizer::new(NormalizeOptions::new().mode(GridMode::Crop))
            .normalize(&image);
        assert_eq!((grid.width(), grid.height()), (8, 8));
        assert_eq!(grid.bitmap().pixel(7, 7), DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_transparency_modes_resolve_identically() {
        let mut image = Bitmap::filled(8, 8, Rgba::opaque(1, 2, 3));
        image.set_pixel(0, 0, Rgba::new(50, 60, 70, 0));
        image.set_pixel(1, 0, Rgba::new(50, 60, 70, 254));

        let replace = TileGridNormalizer::default().normalize(&image);
        let color0 = TileGridNormalizer::new(
            NormalizeOptions::new().transparency(TransparencyMode::Color0),
        )
        .normalize(&image);

        assert_eq!(replace.bitmap(), color0.bitmap());
        assert_eq!(replace.resolved_pixels(), 2);
        assert_eq!(replace.bitmap().pixel(0, 0), DEFAULT_BACKGROUND);
        assert_eq!(replace.bitmap().pixel(1, 0), DEFAULT_BACKGROUND);
        assert_eq!(color0.transparency(), TransparencyMode::Color0);
    }

    #[test]
    fn test_translucent_background_becomes_opaque() {
        let options = NormalizeOptions::new().background(Rgba::new(9, 9, 9, 0));
        let grid = TileGridNormalizer::new(options).normalize(&Bitmap::filled(4, 4, Rgba::opaque(1, 1, 1)));
        assert_eq!(grid.bitmap().pixel(7, 7), Rgba::opaque(9, 9, 9));
        assert!(grid.bitmap().pixels().all(|p| p.is_opaque()));
    }

    #[test]
    fn test_zero_tile_size_defaults() {
        let normalizer = TileGridNormalizer::new(NormalizeOptions::new().tile_size(0));
        assert_eq!(normalizer.options().tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(normalizer.target_size(9, 9), (16, 16));
    }

    #[test]
    fn test_oversized_tile_size_clamped() {
        let normalizer = TileGridNormalizer::new(NormalizeOptions::new().tile_size(usize::MAX / 2));
        assert_eq!(normalizer.options().tile_size, MAX_TILE_SIZE);

        let grid = normalizer.normalize(&Bitmap::filled(8, 8, Rgba::opaque(0, 0, 0)));
        assert_eq!((grid.width(), grid.height()), (MAX_TILE_SIZE, MAX_TILE_SIZE));
        assert_eq!(grid.tile_size(), MAX_TILE_SIZE);
        assert_eq!(grid.bitmap().pixel(MAX_TILE_SIZE - 1, 0), DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("crop".parse::<GridMode>(), Ok(GridMode::Crop));
        assert_eq!("COLOR0".parse::<TransparencyMode>(), Ok(TransparencyMode::Color0));
        let err = "stretch".parse::<GridMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown grid mode 'stretch'");
    }
}
