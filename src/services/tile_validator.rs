use gb_pixels::{
    Bitmap, NormalizedGrid, TileAnalysis, TileAnalyzer, TileGridNormalizer, TilesetAssembler,
};

use crate::models::Settings;

/// A normalized grid together with its analysis
#[derive(Debug, Clone)]
pub struct Validation {
    pub grid: NormalizedGrid,
    pub analysis: TileAnalysis,
}

/// Normalizes an image to the tile grid and checks it against the
/// palette and tile budgets.
pub struct TileValidator {
    normalizer: TileGridNormalizer,
    analyzer: TileAnalyzer,
    assembler: TilesetAssembler,
}

impl TileValidator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            normalizer: TileGridNormalizer::new(settings.normalize_options()),
            analyzer: TileAnalyzer::new(settings.tile_size, settings.tile_limit),
            assembler: TilesetAssembler::new(settings.tileset_columns, settings.tileset_sort),
        }
    }

    pub fn validate(&self, source: &Bitmap) -> Validation {
        let grid = self.normalizer.normalize(source);
        if grid.resolved_pixels() > 0 {
            tracing::debug!(
                pixels = grid.resolved_pixels(),
                mode = %grid.transparency(),
                "Resolved transparent pixels"
            );
        }

        let analysis = self.analyzer.analyze(&grid);

        tracing::info!(
            width = analysis.analyzed_width,
            height = analysis.analyzed_height,
            unique_colors = analysis.unique_colors,
            unique_tiles = analysis.unique_tiles,
            tile_limit = analysis.tile_limit,
            status = %analysis.status,
            "Analyzed tiles"
        );

        Validation { grid, analysis }
    }

    /// Strip of every distinct tile, ordered by frequency
    pub fn tileset(&self, analysis: &TileAnalysis) -> Bitmap {
        self.assembler.assemble(analysis)
    }
}
