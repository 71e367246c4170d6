//! The [`Bitmap`] pixel container.

use super::error::BitmapError;
use crate::color::Rgba;

/// A width × height grid of RGBA8 pixels in row-major order.
///
/// Dimensions are always non-zero; the only fallible constructor is
/// [`Bitmap::from_raw()`], which is where decoded input enters the core.
///
/// # Example
///
/// ```
/// use gb_pixels::{Bitmap, Rgba};
///
/// let mut bitmap = Bitmap::filled(2, 2, Rgba::opaque(0, 0, 0));
/// bitmap.set_pixel(1, 0, Rgba::opaque(255, 255, 255));
///
/// assert_eq!(bitmap.width(), 2);
/// assert_eq!(bitmap.pixel(1, 0), Rgba::opaque(255, 255, 255));
/// assert_eq!(bitmap.as_bytes().len(), 2 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap a decoded RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// - [`BitmapError::ZeroDimension`] if either side is zero
    /// - [`BitmapError::TooLarge`] if the byte size overflows `usize`
    /// - [`BitmapError::LengthMismatch`] if `data.len() != width * height * 4`
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::ZeroDimension { width, height });
        }
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(BitmapError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Like [`Bitmap::filled()`], but rejects sizes whose byte count
    /// overflows `usize` instead of panicking.
    pub fn try_filled(width: usize, height: usize, color: Rgba) -> Result<Self, BitmapError> {
        let width = width.max(1);
        let height = height.max(1);
        byte_len(width, height)?;
        Ok(Self::filled(width, height, color))
    }

    /// Create a bitmap with every pixel set to `color`.
    ///
    /// Zero dimensions are raised to 1.
    ///
    /// # Panics
    ///
    /// If `width * height * 4` overflows `usize`. See [`Bitmap::try_filled()`].
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let bytes = color.to_bytes();
        let mut data = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&bytes);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a fully transparent (all-zero) bitmap.
    pub fn blank(width: usize, height: usize) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Build a bitmap from a pixel slice in row-major order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Bitmap::from_raw()`].
    pub fn from_pixels(width: usize, height: usize, pixels: &[Rgba]) -> Result<Self, BitmapError> {
        let data = pixels.iter().flat_map(|p| p.to_bytes()).collect();
        Self::from_raw(width, height, data)
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false: bitmaps have at least one pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y * self.width + x) * 4
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let i = self.offset(x, y);
        Rgba::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_bytes());
    }

    /// Iterate over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
    }

    /// Mutable access to each pixel's four bytes in row-major order.
    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(4)
    }

    /// The raw RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the bitmap, returning the raw RGBA bytes.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Copy a `w × h` block of `src` starting at `(sx, sy)` into `self` at `(dx, dy)`.
    ///
    /// The block is clipped against both bitmaps; anything outside is skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &mut self,
        src: &Bitmap,
        sx: usize,
        sy: usize,
        w: usize,
        h: usize,
        dx: usize,
        dy: usize,
    ) {
        let w = w
            .min(src.width.saturating_sub(sx))
            .min(self.width.saturating_sub(dx));
        let h = h
            .min(src.height.saturating_sub(sy))
            .min(self.height.saturating_sub(dy));
        if w == 0 {
            return;
        }
        for row in 0..h {
            let s = src.offset(sx, sy + row);
            let d = self.offset(dx, dy + row);
            self.data[d..d + w * 4].copy_from_slice(&src.data[s..s + w * 4]);
        }
    }

    /// Copy the `size × size` block at `(x0, y0)` out as raw bytes in raster order.
    ///
    /// # Panics
    ///
    /// Panics if the block extends past the bitmap edge.
    pub fn block_bytes(&self, x0: usize, y0: usize, size: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(size * size * 4);
        for y in y0..y0 + size {
            let start = self.offset(x0, y);
            out.extend_from_slice(&self.data[start..start + size * 4]);
        }
        out
    }

    /// Mirror the bitmap left to right.
    pub fn flip_horizontal(&self) -> Bitmap {
        let mut out = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                out.set_pixel(self.width - 1 - x, y, self.pixel(x, y));
            }
        }
        out
    }
}

fn byte_len(width: usize, height: usize) -> Result<usize, BitmapError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(BitmapError::TooLarge { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_validates() {
        assert_eq!(
            Bitmap::from_raw(0, 4, vec![]),
            Err(BitmapError::ZeroDimension {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            Bitmap::from_raw(2, 2, vec![0; 15]),
            Err(BitmapError::LengthMismatch {
                expected: 16,
                actual: 15
            })
        );
        assert!(Bitmap::from_raw(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            Bitmap::from_raw(usize::MAX, 2, vec![]),
            Err(BitmapError::TooLarge {
                width: usize::MAX,
                height: 2
            })
        );
    }

    #[test]
    fn test_try_filled_rejects_overflow() {
        assert_eq!(
            Bitmap::try_filled(usize::MAX / 2, 3, Rgba::TRANSPARENT),
            Err(BitmapError::TooLarge {
                width: usize::MAX / 2,
                height: 3
            })
        );
        let bitmap = Bitmap::try_filled(0, 3, Rgba::TRANSPARENT).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (1, 3));
    }

    #[test]
    fn test_filled_and_pixels() {
        let c = Rgba::opaque(1, 2, 3);
        let bitmap = Bitmap::filled(3, 2, c);
        assert_eq!(bitmap.len(), 6);
        assert!(bitmap.pixels().all(|p| p == c));
    }

    #[test]
    fn test_filled_floors_zero_dimensions() {
        let bitmap = Bitmap::filled(0, 0, Rgba::TRANSPARENT);
        assert_eq!((bitmap.width(), bitmap.height()), (1, 1));
    }

    #[test]
    fn test_set_and_get_pixel_row_major() {
        let mut bitmap = Bitmap::blank(3, 2);
        bitmap.set_pixel(2, 1, Rgba::new(9, 8, 7, 6));
        assert_eq!(bitmap.pixel(2, 1), Rgba::new(9, 8, 7, 6));
        assert_eq!(&bitmap.as_bytes()[20..24], &[9, 8, 7, 6]);
    }

    #[test]
    fn test_from_pixels() {
        let pixels = [Rgba::opaque(1, 1, 1), Rgba::opaque(2, 2, 2)];
        let bitmap = Bitmap::from_pixels(2, 1, &pixels).unwrap();
        assert_eq!(bitmap.pixels().collect::<Vec<_>>(), pixels.to_vec());
    }

    #[test]
    fn test_blit_clips() {
        let src = Bitmap::filled(4, 4, Rgba::opaque(255, 0, 0));
        let mut dst = Bitmap::filled(3, 3, Rgba::opaque(0, 0, 0));
        dst.blit(&src, 0, 0, 4, 4, 1, 1);
        assert_eq!(dst.pixel(0, 0), Rgba::opaque(0, 0, 0));
        assert_eq!(dst.pixel(0, 2), Rgba::opaque(0, 0, 0));
        assert_eq!(dst.pixel(1, 1), Rgba::opaque(255, 0, 0));
        assert_eq!(dst.pixel(2, 2), Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn test_block_bytes_raster_order() {
        let mut bitmap = Bitmap::blank(4, 4);
        bitmap.set_pixel(2, 2, Rgba::new(1, 2, 3, 4));
        bitmap.set_pixel(3, 3, Rgba::new(5, 6, 7, 8));
        let block = bitmap.block_bytes(2, 2, 2);
        assert_eq!(block.len(), 16);
        assert_eq!(&block[0..4], &[1, 2, 3, 4]);
        assert_eq!(&block[12..16], &[5, 6, 7, 8]);
    }

    #[test]
    fn test_flip_horizontal() {
        let mut bitmap = Bitmap::blank(3, 1);
        bitmap.set_pixel(0, 0, Rgba::opaque(1, 1, 1));
        let flipped = bitmap.flip_horizontal();
        assert_eq!(flipped.pixel(2, 0), Rgba::opaque(1, 1, 1));
        assert_eq!(flipped.flip_horizontal(), bitmap);
    }
}
