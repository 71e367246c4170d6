//! JSON report for a tile validation run.

use chrono::{DateTime, Utc};
use gb_pixels::{GridMode, TileAnalysis, TileSort, TileStatus, TransparencyMode, TOP_COLORS};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Settings;
use crate::rendering::SourceImage;

/// Format identifier written into every report
pub const REPORT_VERSION: &str = "tile-validator-v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub input: ReportInput,
    pub settings: ReportSettings,
    pub results: ReportResults,
    pub top_colors: Vec<ReportColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    pub file_name: String,
    pub mime_type: String,
    pub src_width: usize,
    pub src_height: usize,
}

/// The settings that shaped the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettings {
    pub tile_size: usize,
    pub tile_limit: usize,
    #[serde(with = "crate::models::serde_str")]
    pub multiple_of_tile_handling: GridMode,
    #[serde(with = "crate::models::serde_str")]
    pub transparency_mode: TransparencyMode,
    pub tileset_columns: usize,
    #[serde(with = "crate::models::serde_str")]
    pub tileset_sort: TileSort,
}

impl From<&Settings> for ReportSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            tile_size: settings.tile_size,
            tile_limit: settings.tile_limit,
            multiple_of_tile_handling: settings.multiple_of_tile_handling,
            transparency_mode: settings.transparency_mode,
            tileset_columns: settings.tileset_columns,
            tileset_sort: settings.tileset_sort,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResults {
    pub analyzed_width: usize,
    pub analyzed_height: usize,
    pub tiles_x: usize,
    pub tiles_y: usize,
    pub total_tiles: usize,
    pub unique_colors: usize,
    pub unique_tiles: usize,
    pub rare_unique_tiles: usize,
    pub palette_ok: bool,
    pub tiles_ok: bool,
    pub tile_limit: usize,
    #[serde(with = "crate::models::serde_str")]
    pub status: TileStatus,
}

impl From<&TileAnalysis> for ReportResults {
    fn from(analysis: &TileAnalysis) -> Self {
        Self {
            analyzed_width: analysis.analyzed_width,
            analyzed_height: analysis.analyzed_height,
            tiles_x: analysis.tiles_x,
            tiles_y: analysis.tiles_y,
            total_tiles: analysis.total_tiles,
            unique_colors: analysis.unique_colors,
            unique_tiles: analysis.unique_tiles,
            rare_unique_tiles: analysis.rare_unique_tiles,
            palette_ok: analysis.palette_ok,
            tiles_ok: analysis.tiles_ok,
            tile_limit: analysis.tile_limit,
            status: analysis.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportColor {
    pub rgba: [u8; 4],
    pub count: usize,
}

impl Report {
    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builds a [`Report`] from an analysis and what is known about its input
pub struct ReportBuilder {
    input: ReportInput,
    settings: ReportSettings,
    timestamp: Option<DateTime<Utc>>,
}

impl ReportBuilder {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            input: ReportInput {
                file_name: file_name.into(),
                mime_type: mime_type.into(),
                src_width: 0,
                src_height: 0,
            },
            settings: ReportSettings::from(&Settings::default()),
            timestamp: None,
        }
    }

    /// Builder seeded from a decoded source
    pub fn for_source(source: &SourceImage) -> Self {
        Self::new(source.file_name.clone(), source.mime_type)
            .source_size(source.src_width, source.src_height)
    }

    /// Size of the input as decoded
    pub fn source_size(mut self, width: usize, height: usize) -> Self {
        self.input.src_width = width;
        self.input.src_height = height;
        self
    }

    pub fn settings(mut self, settings: &Settings) -> Self {
        self.settings = ReportSettings::from(settings);
        self
    }

    /// Fix the timestamp instead of using the current time
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn build(self, analysis: &TileAnalysis) -> Report {
        Report {
            version: REPORT_VERSION.to_string(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            input: self.input,
            settings: self.settings,
            results: ReportResults::from(analysis),
            top_colors: analysis
                .top_colors(TOP_COLORS)
                .into_iter()
                .map(|c| ReportColor {
                    rgba: c.rgba.to_bytes(),
                    count: c.count,
                })
                .collect(),
        }
    }
}
