//! Synthetic test images and on-disk helpers.

use gb_pixels::{Bitmap, Palette, Rgba};
use std::path::{Path, PathBuf};

/// Colors used by the fixtures
pub mod colors {
    use gb_pixels::Rgba;

    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    /// Lightest entry of the default palette, also the padding background
    pub const DMG_LIGHTEST: Rgba = Rgba::opaque(224, 248, 207);
}

/// Horizontal grey ramp, black on the left, white on the right
pub fn gradient(width: usize, height: usize) -> Bitmap {
    let mut bitmap = Bitmap::blank(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = (x * 255 / (width - 1).max(1)) as u8;
            bitmap.set_pixel(x, y, Rgba::opaque(v, v, v));
        }
    }
    bitmap
}

/// Checkerboard of `cell`-pixel squares in two colors
pub fn checkerboard(width: usize, height: usize, cell: usize, a: Rgba, b: Rgba) -> Bitmap {
    let mut bitmap = Bitmap::blank(width, height);
    for y in 0..height {
        for x in 0..width {
            let color = if (x / cell + y / cell) % 2 == 0 { a } else { b };
            bitmap.set_pixel(x, y, color);
        }
    }
    bitmap
}

/// Bitmap whose every 8x8 tile differs from every other
pub fn unique_tiles(tiles_x: usize, tiles_y: usize, palette: &Palette) -> Bitmap {
    let mut bitmap = Bitmap::filled(tiles_x * 8, tiles_y * 8, palette.color(0));
    for t in 0..tiles_x * tiles_y {
        let (tx, ty) = (t % tiles_x, t / tiles_x);
        // Encode the tile number in base 4 along the tile's first rows
        let mut n = t;
        for i in 0..16 {
            let color = palette.color(n % 4);
            n /= 4;
            bitmap.set_pixel(tx * 8 + i % 8, ty * 8 + i / 8, color);
        }
    }
    bitmap
}

/// Write a bitmap as an RGBA PNG through the `image` crate
pub fn write_png(dir: &Path, name: &str, bitmap: &Bitmap) -> PathBuf {
    let path = dir.join(name);
    let image = image::RgbaImage::from_raw(
        bitmap.width() as u32,
        bitmap.height() as u32,
        bitmap.as_bytes().to_vec(),
    )
    .unwrap();
    image.save(&path).unwrap();
    path
}

/// Read a PNG back into a bitmap
pub fn read_png(path: &Path) -> Bitmap {
    let image = image::open(path).unwrap().to_rgba8();
    let (w, h) = image.dimensions();
    Bitmap::from_raw(w as usize, h as usize, image.into_raw()).unwrap()
}
