//! Whole-bitmap quantization passes.

use super::palette::Palette;
use crate::bitmap::Bitmap;

/// Replace every pixel with its nearest palette entry.
///
/// Output pixels are opaque. This is the plain quantize step used when
/// dithering is off and after ordered dithering.
pub fn quantize_bitmap(bitmap: &mut Bitmap, palette: &Palette) {
    for px in bitmap.pixels_mut() {
        let (idx, _) = palette.find_nearest([px[0] as f32, px[1] as f32, px[2] as f32]);
        px.copy_from_slice(&palette.color(idx).to_bytes());
    }
}

/// Final safety pass: snap any pixel whose RGB is not exactly a palette
/// entry to its nearest entry, and force every alpha to 255.
///
/// Already-on-palette RGB is left as is. Returns the number of pixels whose
/// RGB had to be replaced.
pub fn enforce_palette(bitmap: &mut Bitmap, palette: &Palette) -> usize {
    let mut replaced = 0;
    for px in bitmap.pixels_mut() {
        let rgb = [px[0], px[1], px[2]];
        if !palette.colors().iter().any(|c| c.rgb() == rgb) {
            let (idx, _) = palette.find_nearest([rgb[0] as f32, rgb[1] as f32, rgb[2] as f32]);
            px[..3].copy_from_slice(&palette.color(idx).rgb());
            replaced += 1;
        }
        px[3] = 255;
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn gradient(width: usize, height: usize) -> Bitmap {
        let mut bitmap = Bitmap::blank(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y * width) * 255 / (width * height - 1)) as u8;
                bitmap.set_pixel(x, y, Rgba::new(v, v / 2, 255 - v, 200));
            }
        }
        bitmap
    }

    #[test]
    fn test_quantize_only_palette_colors() {
        let palette = Palette::dmg();
        let mut bitmap = gradient(8, 8);
        quantize_bitmap(&mut bitmap, &palette);
        assert!(bitmap.pixels().all(|p| palette.colors().contains(&p)));
    }

    #[test]
    fn test_quantize_idempotent() {
        let palette = Palette::dmg();
        let mut once = gradient(8, 4);
        quantize_bitmap(&mut once, &palette);
        let mut twice = once.clone();
        quantize_bitmap(&mut twice, &palette);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_enforce_counts_and_fixes() {
        let palette = Palette::dmg();
        let mut bitmap = Bitmap::filled(2, 1, palette.color(2));
        bitmap.set_pixel(1, 0, Rgba::new(255, 0, 0, 10));
        let replaced = enforce_palette(&mut bitmap, &palette);
        assert_eq!(replaced, 1);
        assert_eq!(bitmap.pixel(1, 0), Rgba::opaque(0x30, 0x68, 0x50));
        assert_eq!(bitmap.pixel(0, 0), palette.color(2));
    }

    #[test]
    fn test_enforce_leaves_on_palette_unchanged() {
        let palette = Palette::dmg();
        let mut bitmap = gradient(6, 6);
        quantize_bitmap(&mut bitmap, &palette);
        let before = bitmap.clone();
        assert_eq!(enforce_palette(&mut bitmap, &palette), 0);
        assert_eq!(bitmap, before);
    }

    #[test]
    fn test_enforce_forces_opaque_without_counting() {
        let palette = Palette::dmg();
        let c = palette.color(0);
        let mut bitmap = Bitmap::filled(1, 1, Rgba::new(c.r, c.g, c.b, 0));
        assert_eq!(enforce_palette(&mut bitmap, &palette), 0);
        assert_eq!(bitmap.pixel(0, 0), c);
    }
}
