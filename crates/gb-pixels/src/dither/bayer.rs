//! Ordered dithering with a 4×4 Bayer matrix.

use super::{Dither, DitherOptions};
use crate::bitmap::Bitmap;
use crate::palette::{quantize_bitmap, Palette};

/// The 4×4 Bayer threshold matrix, values 0..=15, indexed `[y % 4][x % 4]`.
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Peak-to-peak spread of the threshold offsets at full strength.
const SPREAD: f64 = 64.0;

/// Ordered (Bayer) dithering.
///
/// Pixel `(x, y)` is offset by `(m / 15 - 0.5) * 64 * strength` on each of
/// R, G and B, where `m = BAYER_4X4[y % 4][x % 4]`, before the usual
/// nearest-color quantization. There is no dependency between pixels, so the
/// pattern tiles every 4 pixels in both directions.
///
/// # Example
///
/// ```
/// use gb_pixels::{BayerDither, Bitmap, Dither, DitherOptions, Palette, Rgba};
///
/// let palette = Palette::dmg();
/// let mut bitmap = Bitmap::filled(4, 4, Rgba::opaque(120, 170, 110));
/// BayerDither.dither(&mut bitmap, &palette, &DitherOptions::new().strength(1.0));
/// assert!(bitmap.pixels().all(|p| palette.contains(p)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BayerDither;

impl BayerDither {
    /// Threshold offset for pixel `(x, y)`.
    #[inline]
    pub fn threshold(x: usize, y: usize, strength: f32) -> f64 {
        let m = f64::from(BAYER_4X4[y % 4][x % 4]);
        (m / 15.0 - 0.5) * SPREAD * f64::from(strength)
    }

    /// Apply the threshold offsets without quantizing.
    ///
    /// Channels are clamped to `[0, 255]` and rounded half to even; alpha
    /// is untouched.
    pub fn perturb(bitmap: &mut Bitmap, strength: f32) {
        let width = bitmap.width();
        for (i, px) in bitmap.pixels_mut().enumerate() {
            let t = Self::threshold(i % width, i / width, strength);
            for c in px.iter_mut().take(3) {
                *c = (f64::from(*c) + t).clamp(0.0, 255.0).round_ties_even() as u8;
            }
        }
    }
}

impl Dither for BayerDither {
    fn dither(&self, bitmap: &mut Bitmap, palette: &Palette, options: &DitherOptions) {
        Self::perturb(bitmap, options.strength);
        quantize_bitmap(bitmap, palette);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn test_threshold_range() {
        assert_eq!(BayerDither::threshold(0, 0, 1.0), -32.0);
        assert_eq!(BayerDither::threshold(0, 3, 1.0), 32.0);
        assert_eq!(BayerDither::threshold(0, 3, 0.5), 16.0);
        assert_eq!(BayerDither::threshold(2, 1, 0.0), 0.0);
    }

    #[test]
    fn test_matrix_is_permutation() {
        let mut seen = [false; 16];
        for row in BAYER_4X4 {
            for m in row {
                seen[m as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_perturb_tiles_every_four() {
        let mut bitmap = Bitmap::filled(8, 8, Rgba::opaque(128, 128, 128));
        BayerDither::perturb(&mut bitmap, 1.0);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(bitmap.pixel(x, y), bitmap.pixel(x + 4, y + 4));
            }
        }
        assert_eq!(bitmap.pixel(0, 0), Rgba::opaque(96, 96, 96));
        assert_eq!(bitmap.pixel(0, 3), Rgba::opaque(160, 160, 160));
    }

    #[test]
    fn test_perturb_clamps_and_keeps_alpha() {
        let mut bitmap = Bitmap::filled(4, 4, Rgba::new(250, 5, 128, 40));
        BayerDither::perturb(&mut bitmap, 1.0);
        assert_eq!(bitmap.pixel(0, 3), Rgba::new(255, 37, 160, 40));
        assert_eq!(bitmap.pixel(0, 0), Rgba::new(218, 0, 96, 40));
    }

    #[test]
    fn test_perturb_rounds_half_to_even() {
        // strength 1/64 gives offsets of exactly -0.5 at (0, 0) and +0.5 at (0, 3)
        let mut bitmap = Bitmap::filled(4, 4, Rgba::opaque(127, 127, 127));
        bitmap.set_pixel(0, 3, Rgba::opaque(126, 126, 126));
        BayerDither::perturb(&mut bitmap, 1.0 / 64.0);
        assert_eq!(bitmap.pixel(0, 0), Rgba::opaque(126, 126, 126));
        assert_eq!(bitmap.pixel(0, 3), Rgba::opaque(126, 126, 126));
    }

    #[test]
    fn test_mixes_shades_on_flat_midtone() {
        let palette = Palette::dmg();
        // halfway between the two middle greens
        let mut bitmap = Bitmap::filled(4, 4, Rgba::opaque(91, 148, 94));
        BayerDither.dither(&mut bitmap, &palette, &DitherOptions::new().strength(1.0));
        let distinct: std::collections::HashSet<_> = bitmap.pixels().collect();
        assert!(distinct.len() >= 2);
    }
}
