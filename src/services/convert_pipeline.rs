use std::time::Instant;

use gb_pixels::{Bitmap, Converted, Converter};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::models::Settings;
use crate::rendering::{crop_rect, render_canvas};

/// Pipeline that orchestrates crop → resize → blur → adjust → dither → safety pass
pub struct ConvertPipeline {
    settings: Settings,
    converter: Converter,
}

impl ConvertPipeline {
    /// Build a pipeline from (sanitized) settings.
    ///
    /// Fails only when the palette is invalid.
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let settings = settings.sanitized();
        let converter = settings.converter()?;
        Ok(Self {
            settings,
            converter,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the whole pipeline on a decoded source
    pub fn run(&self, source: &Bitmap) -> Result<Converted, AppError> {
        let started = Instant::now();
        let output = self.settings.output;

        let rect = crop_rect(
            source.width(),
            source.height(),
            &self.settings.crop,
            output.aspect(),
        );
        let canvas = render_canvas(source, rect, output, self.settings.blur_radius)?;

        tracing::debug!(
            crop_x = rect.x,
            crop_y = rect.y,
            crop_w = rect.w,
            crop_h = rect.h,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Canvas prepared"
        );

        let quantize_started = Instant::now();
        let converted = self.converter.convert(canvas);

        tracing::debug!(
            dither = %self.settings.dither_mode,
            strength = self.settings.dither_strength,
            replaced = converted.safety_replacements(),
            elapsed_ms = quantize_started.elapsed().as_millis() as u64,
            "Pixels quantized"
        );

        tracing::info!(
            width = converted.width(),
            height = converted.height(),
            "Converted image"
        );

        Ok(converted)
    }

    /// SHA-256 over the source pixels and the serialized settings.
    ///
    /// Identical fingerprints always produce identical output.
    pub fn fingerprint(&self, source: &Bitmap) -> Result<String, AppError> {
        let mut hasher = Sha256::new();

        hasher.update((source.width() as u64).to_le_bytes());
        hasher.update((source.height() as u64).to_le_bytes());
        hasher.update(source.as_bytes());
        hasher.update(b"|settings:");
        hasher.update(serde_json::to_vec(&self.settings)?);

        Ok(hex::encode(hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutputSize;
    use gb_pixels::{DitherMode, Rgba};

    fn gradient(width: usize, height: usize) -> Bitmap {
        let mut bitmap = Bitmap::blank(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 255 / (width + height - 2)) as u8;
                bitmap.set_pixel(x, y, Rgba::opaque(v, v, v));
            }
        }
        bitmap
    }

    fn small_settings() -> Settings {
        Settings {
            output: OutputSize::clamped(32, 16),
            ..Settings::default()
        }
    }

    #[test]
    fn test_run_produces_output_size_on_palette() {
        let pipeline = ConvertPipeline::new(Settings {
            dither_mode: DitherMode::Floyd,
            ..small_settings()
        })
        .unwrap();

        let converted = pipeline.run(&gradient(64, 64)).unwrap();
        assert_eq!((converted.width(), converted.height()), (32, 16));
        for px in converted.bitmap().pixels() {
            assert!(converted.palette().contains(px));
        }
        assert_eq!(converted.safety_replacements(), 0);
    }

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = ConvertPipeline::new(Settings {
            dither_mode: DitherMode::Bayer,
            blur_radius: 0.8,
            ..small_settings()
        })
        .unwrap();
        let source = gradient(50, 40);

        let a = pipeline.run(&source).unwrap();
        let b = pipeline.run(&source).unwrap();
        assert_eq!(a.bitmap(), b.bitmap());
    }

    #[test]
    fn test_fingerprint_tracks_inputs() {
        let source = gradient(20, 20);
        let a = ConvertPipeline::new(small_settings()).unwrap();
        let b = ConvertPipeline::new(Settings {
            contrast: 10.0,
            ..small_settings()
        })
        .unwrap();

        let fp = a.fingerprint(&source).unwrap();
        assert_eq!(fp.len(), 64);
        assert_eq!(fp, a.fingerprint(&source).unwrap());
        assert_ne!(fp, b.fingerprint(&source).unwrap());
        assert_ne!(fp, a.fingerprint(&gradient(20, 21)).unwrap());
    }

    #[test]
    fn test_invalid_palette_rejected() {
        let result = ConvertPipeline::new(Settings {
            palette: vec!["#000".into(), "#000".into(), "#fff".into(), "#aaa".into()],
            ..Settings::default()
        });
        assert!(matches!(result, Err(AppError::Palette(_))));
    }

    #[test]
    fn test_new_sanitizes_settings() {
        let pipeline = ConvertPipeline::new(Settings {
            gamma: -1.0,
            export_scale: 0,
            ..Settings::default()
        })
        .unwrap();
        assert!(pipeline.settings().gamma > 0.0);
        assert_eq!(pipeline.settings().export_scale, 1);
    }
}
