//! Assertion helpers for tests.

use gb_pixels::{Bitmap, Palette, Rgba};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::path::Path;

/// Assert every pixel is an opaque palette entry
pub fn assert_on_palette(bitmap: &Bitmap, palette: &Palette) {
    for (i, px) in bitmap.pixels().enumerate() {
        assert!(
            palette.contains(px),
            "pixel {} at ({}, {}) is {} which is not in the palette {:?}",
            i,
            i % bitmap.width(),
            i / bitmap.width(),
            px,
            palette.to_hex()
        );
    }
}

/// Assert the bytes start with the PNG signature
pub fn assert_png_bytes(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]),
        "Expected PNG data, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert the file is a 2-bit indexed PNG whose PLTE equals the palette
pub fn assert_indexed_png(path: &Path, palette: &Palette) {
    let bytes = std::fs::read(path).unwrap();
    assert_png_bytes(&bytes);

    let decoder = png::Decoder::new(std::io::Cursor::new(&bytes));
    let reader = decoder.read_info().unwrap();
    let info = reader.info();
    assert_eq!(info.color_type, png::ColorType::Indexed);
    assert_eq!(info.bit_depth, png::BitDepth::Two);

    let plte: Vec<u8> = info.palette.as_ref().map(|p| p.to_vec()).unwrap_or_default();
    let expected: Vec<u8> = palette.colors().iter().flat_map(|c| c.rgb()).collect();
    assert_eq!(plte, expected, "PLTE must list the palette in declared order");
}

/// Distinct colors of a bitmap
pub fn distinct_colors(bitmap: &Bitmap) -> BTreeSet<[u8; 4]> {
    bitmap.pixels().map(Rgba::to_bytes).collect()
}
