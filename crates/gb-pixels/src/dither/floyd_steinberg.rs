//! Floyd-Steinberg error diffusion dithering algorithm.

use crate::bitmap::Bitmap;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, DitherOptions, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion dithering.
///
/// Quantizes inline: each pixel is snapped to its nearest palette entry as it
/// is visited, and the scaled residual is pushed to 4 unvisited neighbors:
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Weights: 7/16 right, 3/16 bottom-left, 5/16 bottom, 1/16 bottom-right.
/// The scan is always left to right, top to bottom; there is no serpentine
/// mode. Error that would land outside the bitmap is dropped.
///
/// # Example
///
/// ```
/// use gb_pixels::{Bitmap, Dither, DitherOptions, FloydSteinberg, Palette, Rgba};
///
/// let palette = Palette::dmg();
/// let mut bitmap = Bitmap::filled(8, 8, Rgba::opaque(91, 148, 94));
/// FloydSteinberg.dither(&mut bitmap, &palette, &DitherOptions::new().strength(1.0));
/// assert!(bitmap.pixels().all(|p| palette.contains(p)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(&self, bitmap: &mut Bitmap, palette: &Palette, options: &DitherOptions) {
        dither_with_kernel(bitmap, palette, &FLOYD_STEINBERG, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn black_white() -> Palette {
        Palette::from_hex(&["#000000", "#555555", "#aaaaaa", "#ffffff"]).unwrap()
    }

    #[test]
    fn test_floyd_steinberg_basic() {
        let palette = black_white();
        let mut bitmap = Bitmap::filled(4, 4, Rgba::opaque(40, 40, 40));
        FloydSteinberg.dither(&mut bitmap, &palette, &DitherOptions::new().strength(1.0));

        let black = bitmap.pixels().filter(|&p| p == palette.color(0)).count();
        let gray = bitmap.pixels().filter(|&p| p == palette.color(1)).count();
        // 40 sits between 0 and 85, so both shades appear
        assert!(black > 0 && gray > 0);
        assert_eq!(black + gray, 16);
    }

    #[test]
    fn test_first_pixel_and_right_neighbor() {
        let palette = black_white();
        // 40 -> 0 (error 40); right neighbor gets 40 * 7/16 = 17.5 -> 57.5 -> 85
        let mut bitmap = Bitmap::filled(2, 1, Rgba::opaque(40, 40, 40));
        FloydSteinberg.dither(&mut bitmap, &palette, &DitherOptions::new().strength(1.0));
        assert_eq!(bitmap.pixel(0, 0), palette.color(0));
        assert_eq!(bitmap.pixel(1, 0), palette.color(1));
    }

    #[test]
    fn test_strength_scales_residual() {
        let palette = black_white();
        // half strength: 40 * 0.5 * 7/16 = 8.75 -> 48.75, still nearest 85
        let mut half = Bitmap::filled(2, 1, Rgba::opaque(40, 40, 40));
        FloydSteinberg.dither(&mut half, &palette, &DitherOptions::new().strength(0.5));
        assert_eq!(half.pixel(1, 0), palette.color(1));

        // 30 -> 0; 30 * 0.25 * 7/16 = 3.28 -> 33.3, stays black
        let mut quarter = Bitmap::filled(2, 1, Rgba::opaque(30, 30, 30));
        FloydSteinberg.dither(&mut quarter, &palette, &DitherOptions::new().strength(0.25));
        assert_eq!(quarter.pixel(1, 0), palette.color(0));

        // full strength: 30 * 7/16 = 13.1 -> 43.1, nearest 85
        let mut full = Bitmap::filled(2, 1, Rgba::opaque(30, 30, 30));
        FloydSteinberg.dither(&mut full, &palette, &DitherOptions::new().strength(1.0));
        assert_eq!(full.pixel(1, 0), palette.color(1));
    }

    #[test]
    fn test_error_does_not_flow_upward_or_left() {
        let palette = black_white();
        // bottom-right pixel is far off palette; nothing before it can change
        let mut bitmap = Bitmap::filled(3, 3, Rgba::opaque(0, 0, 0));
        bitmap.set_pixel(2, 2, Rgba::opaque(120, 120, 120));
        FloydSteinberg.dither(&mut bitmap, &palette, &DitherOptions::new().strength(1.0));
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (2, 2) {
                    assert_eq!(bitmap.pixel(x, y), palette.color(0));
                }
            }
        }
    }

    #[test]
    fn test_exact_palette_input_unchanged() {
        let palette = Palette::dmg();
        let mut bitmap = Bitmap::blank(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                bitmap.set_pixel(x, y, palette.color((x + y) % 4));
            }
        }
        let before = bitmap.clone();
        FloydSteinberg.dither(&mut bitmap, &palette, &DitherOptions::new().strength(1.0));
        assert_eq!(bitmap, before);
    }
}
