use crate::error::AppError;
use crate::models::OutputSize;
use gb_pixels::{
    Converter, DitherMode, DitherOptions, GridMode, NormalizeOptions, Palette, PreprocessOptions,
    TileSort, TransparencyMode, DEFAULT_COLUMNS, DEFAULT_TILE_LIMIT, DEFAULT_TILE_SIZE,
    MAX_COLUMNS, MAX_TILE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Largest integer upscale offered for export
pub const MAX_EXPORT_SCALE: u32 = 8;

/// Every tunable of a conversion and a tile analysis, loaded from YAML.
///
/// Missing keys take their defaults, so a config file only needs to name
/// what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Brightness offset in UI units (x2.55 per channel)
    pub brightness: f32,
    /// Contrast in [-255, 255]
    pub contrast: f32,
    /// Gamma exponent (> 0)
    pub gamma: f32,
    /// Gaussian blur sigma in output pixels; 0 disables
    pub blur_radius: f32,
    #[serde(with = "crate::models::serde_str")]
    pub dither_mode: DitherMode,
    /// Dither strength in [0, 1]
    pub dither_strength: f32,
    /// Four `#rrggbb` entries, darkest first by convention
    pub palette: Vec<String>,

    pub tile_size: usize,
    pub tile_limit: usize,
    #[serde(with = "crate::models::serde_str")]
    pub multiple_of_tile_handling: GridMode,
    #[serde(with = "crate::models::serde_str")]
    pub transparency_mode: TransparencyMode,

    pub output: OutputSize,
    pub crop: CropSettings,
    /// Integer nearest-neighbour upscale for export, 1-8
    pub export_scale: u32,
    pub tileset_columns: usize,
    #[serde(with = "crate::models::serde_str")]
    pub tileset_sort: TileSort,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            gamma: 1.0,
            blur_radius: 0.0,
            dither_mode: DitherMode::Off,
            dither_strength: 0.5,
            palette: Palette::dmg().to_hex(),
            tile_size: DEFAULT_TILE_SIZE,
            tile_limit: DEFAULT_TILE_LIMIT,
            multiple_of_tile_handling: GridMode::Pad,
            transparency_mode: TransparencyMode::Replace,
            output: OutputSize::DMG,
            crop: CropSettings::default(),
            export_scale: 1,
            tileset_columns: DEFAULT_COLUMNS,
            tileset_sort: TileSort::Asc,
        }
    }
}

/// Source crop: aspect, zoom and pan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropSettings {
    #[serde(with = "crate::models::serde_str")]
    pub aspect: CropAspect,
    /// Zoom factor, >= 1
    pub zoom: f32,
    /// Horizontal pan in [-1, 1]
    pub pan_x: f32,
    /// Vertical pan in [-1, 1]
    pub pan_y: f32,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            aspect: CropAspect::Free,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// Crop aspect ratio: `free` or `a:b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropAspect {
    #[default]
    Free,
    Ratio(u32, u32),
}

impl CropAspect {
    /// Width / height, or `None` for a free crop
    pub fn ratio(self) -> Option<f64> {
        match self {
            CropAspect::Free => None,
            CropAspect::Ratio(a, b) => Some(a as f64 / b as f64),
        }
    }
}

impl fmt::Display for CropAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropAspect::Free => f.write_str("free"),
            CropAspect::Ratio(a, b) => write!(f, "{a}:{b}"),
        }
    }
}

impl FromStr for CropAspect {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("free") {
            return Ok(CropAspect::Free);
        }
        let invalid = || AppError::InvalidArgument(format!("crop aspect '{s}' is not free or a:b"));
        let (a, b) = s.split_once(':').ok_or_else(invalid)?;
        let a: u32 = a.trim().parse().map_err(|_| invalid())?;
        let b: u32 = b.trim().parse().map_err(|_| invalid())?;
        if a == 0 || b == 0 {
            return Err(invalid());
        }
        Ok(CropAspect::Ratio(a, b))
    }
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// A missing or unparseable file logs a warning and yields defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(settings) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    settings
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse settings from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, AppError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Floor and clamp degenerate values so every stage receives usable input.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let pre = self.preprocess_options();
        self.brightness = pre.brightness;
        self.contrast = pre.contrast;
        if pre.gamma != self.gamma {
            tracing::warn!(value = self.gamma, floored = pre.gamma, "Gamma out of range");
        }
        self.gamma = pre.gamma;

        if !(self.blur_radius.is_finite() && self.blur_radius >= 0.0) {
            tracing::warn!(value = self.blur_radius, "Blur radius out of range, disabling blur");
            self.blur_radius = 0.0;
        }

        let strength = self.dither_options().strength;
        if strength != self.dither_strength {
            tracing::warn!(value = self.dither_strength, clamped = strength, "Dither strength out of range");
        }
        self.dither_strength = strength;

        if self.tile_size == 0 {
            tracing::warn!("Tile size 0, using {}", defaults.tile_size);
            self.tile_size = defaults.tile_size;
        }
        if self.tile_size > MAX_TILE_SIZE {
            tracing::warn!(value = self.tile_size, clamped = MAX_TILE_SIZE, "Tile size too large");
            self.tile_size = MAX_TILE_SIZE;
        }
        if self.tile_limit == 0 {
            tracing::warn!("Tile limit 0, using {}", defaults.tile_limit);
            self.tile_limit = defaults.tile_limit;
        }
        if self.tileset_columns == 0 {
            tracing::warn!("Tileset columns 0, using {}", defaults.tileset_columns);
            self.tileset_columns = defaults.tileset_columns;
        }
        if self.tileset_columns > MAX_COLUMNS {
            tracing::warn!(value = self.tileset_columns, clamped = MAX_COLUMNS, "Tileset columns too large");
            self.tileset_columns = MAX_COLUMNS;
        }

        let scale = self.export_scale.clamp(1, MAX_EXPORT_SCALE);
        if scale != self.export_scale {
            tracing::warn!(value = self.export_scale, clamped = scale, "Export scale out of range");
        }
        self.export_scale = scale;

        let output = OutputSize::clamped(self.output.width, self.output.height);
        if output != self.output {
            tracing::warn!(requested = %self.output, clamped = %output, "Output size out of range");
        }
        self.output = output;

        let crop = &mut self.crop;
        crop.zoom = if crop.zoom.is_finite() { crop.zoom.max(1.0) } else { 1.0 };
        crop.pan_x = if crop.pan_x.is_finite() { crop.pan_x.clamp(-1.0, 1.0) } else { 0.0 };
        crop.pan_y = if crop.pan_y.is_finite() { crop.pan_y.clamp(-1.0, 1.0) } else { 0.0 };

        self
    }

    /// Parse the configured palette
    pub fn palette(&self) -> Result<Palette, AppError> {
        Ok(Palette::from_hex(&self.palette)?)
    }

    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions::new()
            .brightness(self.brightness)
            .contrast(self.contrast)
            .gamma(self.gamma)
            .sanitized()
    }

    pub fn dither_options(&self) -> DitherOptions {
        DitherOptions::new().strength(self.dither_strength)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::new()
            .tile_size(self.tile_size)
            .mode(self.multiple_of_tile_handling)
            .transparency(self.transparency_mode)
    }

    /// Build the pixel pipeline these settings describe
    pub fn converter(&self) -> Result<Converter, AppError> {
        Ok(Converter::new(self.palette()?)
            .preprocess(self.preprocess_options())
            .dither(self.dither_mode)
            .strength(self.dither_strength))
    }
}
