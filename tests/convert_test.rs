//! End-to-end conversion: decode → pipeline → indexed PNG on disk.

mod common;

use common::colors::*;
use common::*;
use gb_pixels::{DitherMode, Palette, Rgba, TileStatus};
use gbtile::models::{OutputSize, Settings};
use gbtile::rendering::{encode_indexed, export_file_name, SourceImage, MAX_INPUT_EDGE};
use gbtile::services::{RenderOutcome, RenderSession};
use pretty_assertions::assert_eq;

fn session_for(path: &std::path::Path, settings: Settings) -> RenderSession {
    let mut session = RenderSession::new(settings);
    session.load_source(path).unwrap();
    session
}

#[test]
fn test_solid_red_becomes_nearest_green() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(dir.path(), "red.png", &gb_pixels::Bitmap::filled(16, 16, RED));

    let mut session = session_for(
        &input,
        Settings {
            output: OutputSize::clamped(16, 16),
            ..Settings::default()
        },
    );
    assert_eq!(session.render().unwrap(), RenderOutcome::Rendered);

    let output = session.last().unwrap();
    let expected = Rgba::opaque(0x30, 0x68, 0x50);
    assert!(output.converted.bitmap().pixels().all(|px| px == expected));

    let analysis = &output.validation.analysis;
    assert_eq!(analysis.unique_colors, 1);
    assert_eq!(analysis.unique_tiles, 1);
    assert_eq!(analysis.status, TileStatus::Ok);
}

#[test]
fn test_convert_writes_indexed_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(dir.path(), "ramp.png", &gradient(320, 288));

    for mode in [DitherMode::Off, DitherMode::Bayer, DitherMode::Floyd] {
        let mut session = session_for(
            &input,
            Settings {
                dither_mode: mode,
                dither_strength: 0.8,
                ..Settings::default()
            },
        );
        session.render().unwrap();
        let converted = &session.last().unwrap().converted;
        assert_eq!((converted.width(), converted.height()), (160, 144));

        let out = dir.path().join(export_file_name(160, 144, 1));
        std::fs::write(&out, encode_indexed(converted, 1).unwrap()).unwrap();

        let palette = Palette::dmg();
        assert_indexed_png(&out, &palette);
        let written = read_png(&out);
        assert_eq!(&written, converted.bitmap(), "mode {mode}");
        assert_on_palette(&written, &palette);
    }
}

#[test]
fn test_upscaled_export_repeats_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(dir.path(), "ramp.png", &gradient(64, 32));

    let mut session = session_for(
        &input,
        Settings {
            output: OutputSize::clamped(64, 32),
            dither_mode: DitherMode::Bayer,
            ..Settings::default()
        },
    );
    session.render().unwrap();
    let converted = &session.last().unwrap().converted;

    let out = dir.path().join(export_file_name(64, 32, 4));
    assert!(out.ends_with("gb4_64x32_x4.png"));
    std::fs::write(&out, encode_indexed(converted, 4).unwrap()).unwrap();

    let big = read_png(&out);
    assert_eq!((big.width(), big.height()), (256, 128));
    for y in 0..32 {
        for x in 0..64 {
            let px = converted.bitmap().pixel(x, y);
            assert_eq!(big.pixel(x * 4, y * 4), px);
            assert_eq!(big.pixel(x * 4 + 3, y * 4 + 3), px);
        }
    }
}

#[test]
fn test_custom_palette_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(
        dir.path(),
        "check.png",
        &checkerboard(32, 32, 4, BLACK, WHITE),
    );
    let hex = ["#000000", "#555555", "#aaaaaa", "#ffffff"];

    let mut session = session_for(
        &input,
        Settings {
            palette: hex.iter().map(|s| s.to_string()).collect(),
            output: OutputSize::clamped(32, 32),
            ..Settings::default()
        },
    );
    session.render().unwrap();

    let converted = &session.last().unwrap().converted;
    assert_eq!(
        distinct_colors(converted.bitmap()),
        [[0, 0, 0, 255], [255, 255, 255, 255]].into_iter().collect::<std::collections::BTreeSet<_>>()
    );
    assert_eq!(converted.histogram(), [512, 0, 0, 512]);
}

#[test]
fn test_conversion_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(dir.path(), "ramp.png", &gradient(200, 150));
    let settings = Settings {
        dither_mode: DitherMode::Floyd,
        brightness: 15.0,
        contrast: 30.0,
        gamma: 1.4,
        blur_radius: 0.5,
        ..Settings::default()
    };

    let render = || {
        let mut session = session_for(&input, settings.clone());
        session.render().unwrap();
        let converted = &session.last().unwrap().converted;
        encode_indexed(converted, 2).unwrap()
    };

    assert_eq!(render(), render());
}

#[test]
fn test_oversized_input_is_downscaled() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_png(
        dir.path(),
        "wide.png",
        &gb_pixels::Bitmap::filled(5000, 100, WHITE),
    );

    let source = SourceImage::open(&input).unwrap();
    assert_eq!((source.src_width, source.src_height), (5000, 100));
    assert_eq!(source.bitmap.width(), MAX_INPUT_EDGE);
    assert_eq!(source.bitmap.height(), 82);
    assert_eq!(source.file_name, "wide.png");
    assert_eq!(source.mime_type, "image/png");
}

#[test]
fn test_undecodable_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.png");
    std::fs::write(&input, b"this is not a png").unwrap();

    let mut session = RenderSession::new(Settings::default());
    assert!(session.load_source(&input).is_err());
    assert!(session.source().is_none());
    assert!(session.render().is_err());
}
