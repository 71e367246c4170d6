use std::io::Cursor;

use gb_pixels::{Bitmap, Converted};

use crate::error::AppError;
use crate::models::MAX_EXPORT_SCALE;

/// Default file name for an export: `gb4_<w>x<h>.png`, or
/// `gb4_<w>x<h>_x<scale>.png` when upscaled.
pub fn export_file_name(width: usize, height: usize, scale: u32) -> String {
    if scale <= 1 {
        format!("gb4_{width}x{height}.png")
    } else {
        format!("gb4_{width}x{height}_x{scale}.png")
    }
}

/// Encode a converted image as a 2-bit indexed PNG.
///
/// The PLTE chunk holds the palette in declared order, so pixel index `i`
/// is palette entry `i`. `scale` (clamped to 1-8) repeats every pixel in an
/// `scale` x `scale` block.
pub fn encode_indexed(converted: &Converted, scale: u32) -> Result<Vec<u8>, AppError> {
    let scale = scale.clamp(1, MAX_EXPORT_SCALE) as usize;
    let width = converted.width() * scale;
    let height = converted.height() * scale;

    let indices = upscale_indices(&converted.indices(), converted.width(), scale);
    let plte: Vec<u8> = converted
        .palette()
        .colors()
        .iter()
        .flat_map(|c| c.rgb())
        .collect();
    let packed = pack_nbits(&indices, width, 2);

    // Encode PNG (fast settings, oxipng re-compresses)
    let png_bytes = encode_png(
        width,
        height,
        png::ColorType::Indexed,
        png::BitDepth::Two,
        Some(&plte),
        &packed,
    )?;

    // Palette order is part of the output format, so no reductions
    Ok(optimize(
        png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            palette_reduction: false,
            bit_depth_reduction: false,
            color_type_reduction: false,
            grayscale_reduction: false,
            ..Default::default()
        },
    ))
}

/// Encode an RGBA bitmap (tileset strips keep their transparency)
pub fn encode_rgba(bitmap: &Bitmap) -> Result<Vec<u8>, AppError> {
    let png_bytes = encode_png(
        bitmap.width(),
        bitmap.height(),
        png::ColorType::Rgba,
        png::BitDepth::Eight,
        None,
        bitmap.as_bytes(),
    )?;

    Ok(optimize(
        png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            ..Default::default()
        },
    ))
}

/// Re-compress with oxipng, keeping the input when optimization fails
fn optimize(png_bytes: Vec<u8>, options: &oxipng::Options) -> Vec<u8> {
    match oxipng::optimize_from_memory(&png_bytes, options) {
        Ok(optimized) => optimized,
        Err(e) => {
            tracing::debug!(error = %e, "oxipng failed, keeping unoptimized PNG");
            png_bytes
        }
    }
}

/// Encode packed pixel data as a PNG.
fn encode_png(
    width: usize,
    height: usize,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, AppError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width as u32, height as u32);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
    }
    Ok(buf.into_inner())
}

/// Repeat each index in a `scale` x `scale` block.
fn upscale_indices(indices: &[u8], width: usize, scale: usize) -> Vec<u8> {
    if scale == 1 {
        return indices.to_vec();
    }
    let mut out = Vec::with_capacity(indices.len() * scale * scale);
    for row in indices.chunks(width) {
        let wide: Vec<u8> = row
            .iter()
            .flat_map(|&idx| std::iter::repeat(idx).take(scale))
            .collect();
        for _ in 0..scale {
            out.extend_from_slice(&wide);
        }
    }
    out
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let height = indices.len() / width;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_pixels::{Converter, Palette, Rgba};

    fn decode_info(bytes: &[u8]) -> (u32, u32, png::ColorType, png::BitDepth, Option<Vec<u8>>) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        (
            info.width,
            info.height,
            info.color_type,
            info.bit_depth,
            info.palette.as_ref().map(|p| p.to_vec()),
        )
    }

    fn stripes() -> Converted {
        let palette = Palette::dmg();
        let mut bitmap = Bitmap::filled(5, 2, palette.color(0));
        for x in 0..5 {
            bitmap.set_pixel(x, 1, palette.color(x % 4));
        }
        Converter::new(palette).convert(bitmap)
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(160, 144, 1), "gb4_160x144.png");
        assert_eq!(export_file_name(160, 144, 3), "gb4_160x144_x3.png");
    }

    #[test]
    fn test_pack_2bit() {
        // 5 pixels: 4 fit in the first byte, the fifth starts a new one
        let packed = pack_nbits(&[0, 1, 2, 3, 3], 5, 2);
        assert_eq!(packed, vec![0b00_01_10_11, 0b11_00_00_00]);
    }

    #[test]
    fn test_upscale_indices() {
        let out = upscale_indices(&[1, 2, 3, 0], 2, 2);
        assert_eq!(out, vec![1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 0, 0, 3, 3, 0, 0]);
    }

    #[test]
    fn test_indexed_png_keeps_palette_order() {
        let converted = stripes();
        let bytes = encode_indexed(&converted, 1).unwrap();

        let (w, h, color, depth, plte) = decode_info(&bytes);
        assert_eq!((w, h), (5, 2));
        assert_eq!(color, png::ColorType::Indexed);
        assert_eq!(depth, png::BitDepth::Two);
        assert_eq!(
            plte.unwrap(),
            vec![0x07, 0x18, 0x21, 0x30, 0x68, 0x50, 0x86, 0xc0, 0x6c, 0xe0, 0xf8, 0xcf]
        );
    }

    #[test]
    fn test_indexed_png_pixels_roundtrip() {
        let converted = stripes();
        let bytes = encode_indexed(&converted, 1).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        for (x, y, px) in decoded.enumerate_pixels() {
            let expected = converted.bitmap().pixel(x as usize, y as usize);
            assert_eq!(Rgba::from_bytes(px.0), expected);
        }
    }

    #[test]
    fn test_indexed_png_upscaled() {
        let converted = stripes();
        let bytes = encode_indexed(&converted, 3).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (15, 6));
        // Pixel (4, 1) covers the block x 12..15, y 3..6
        let expected = converted.bitmap().pixel(4, 1);
        assert_eq!(Rgba::from_bytes(decoded.get_pixel(14, 5).0), expected);
        assert_eq!(Rgba::from_bytes(decoded.get_pixel(12, 3).0), expected);
    }

    #[test]
    fn test_scale_clamped() {
        let converted = stripes();
        let bytes = encode_indexed(&converted, 50).unwrap();
        let (w, h, ..) = decode_info(&bytes);
        assert_eq!((w, h), (40, 16));
    }

    #[test]
    fn test_rgba_png_keeps_transparency() {
        let mut bitmap = Bitmap::blank(4, 4);
        bitmap.set_pixel(1, 1, Rgba::opaque(255, 0, 0));

        let bytes = encode_rgba(&bitmap).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
    }
}
