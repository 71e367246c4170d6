//! Converted struct with indexed and RGBA views.

use crate::bitmap::Bitmap;
use crate::palette::Palette;

/// The result of running the pixel pipeline.
///
/// Every pixel's RGB is exactly one of the palette entries and every alpha
/// is 255; the pipeline's safety pass guarantees it.
///
/// # Example
///
/// ```
/// use gb_pixels::{Bitmap, Converter, Palette, Rgba};
///
/// let converted = Converter::new(Palette::dmg())
///     .convert(Bitmap::filled(2, 2, Rgba::opaque(255, 0, 0)));
///
/// assert_eq!(converted.width(), 2);
/// assert_eq!(converted.indices(), vec![1, 1, 1, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    bitmap: Bitmap,
    palette: Palette,
    safety_replacements: usize,
}

impl Converted {
    /// Wrap a bitmap that is already on `palette`.
    pub fn new(bitmap: Bitmap, palette: Palette, safety_replacements: usize) -> Self {
        debug_assert!(
            bitmap.pixels().all(|p| p.is_opaque() && palette.contains(p)),
            "converted bitmap must be opaque and on palette"
        );
        Self {
            bitmap,
            palette,
            safety_replacements,
        }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.bitmap.height()
    }

    /// The output pixels.
    #[inline]
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Consume, returning the output pixels.
    #[inline]
    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }

    /// Returns the palette the output was built against.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// How many pixels the final safety pass had to snap onto the palette.
    /// Zero for a well-behaved run.
    #[inline]
    pub fn safety_replacements(&self) -> usize {
        self.safety_replacements
    }

    /// Palette indices, one per pixel, in row-major order.
    pub fn indices(&self) -> Vec<u8> {
        self.bitmap
            .pixels()
            .map(|p| self.palette.index_of(p).unwrap_or(0) as u8)
            .collect()
    }

    /// How many pixels use each palette entry.
    pub fn histogram(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for idx in self.indices() {
            counts[idx as usize] += 1;
        }
        counts
    }
}
