//! Render session: the current source, settings and last results, plus the
//! coalescing policy for re-render requests.

use std::path::Path;

use gb_pixels::Converted;

use crate::error::AppError;
use crate::models::Settings;
use crate::rendering::SourceImage;
use crate::services::{ConvertPipeline, TileValidator, Validation};

/// Where a render loop stands.
///
/// Requests that arrive while a run is in flight collapse into a single
/// follow-up run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    RunningWithPending,
}

impl RunState {
    /// Register a render request. Returns true when a run should start now.
    pub fn request(&mut self) -> bool {
        match self {
            RunState::Idle => {
                *self = RunState::Running;
                true
            }
            RunState::Running | RunState::RunningWithPending => {
                *self = RunState::RunningWithPending;
                false
            }
        }
    }

    /// Register the end of a run. Returns true when the follow-up run should
    /// start now.
    pub fn finish(&mut self) -> bool {
        match self {
            RunState::RunningWithPending => {
                *self = RunState::Running;
                true
            }
            RunState::Running | RunState::Idle => {
                *self = RunState::Idle;
                false
            }
        }
    }

    pub fn is_idle(self) -> bool {
        self == RunState::Idle
    }
}

/// Output of one render
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub fingerprint: String,
    pub converted: Converted,
    /// Tile analysis of the converted image
    pub validation: Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// Source and settings match the previous render; its output was kept
    Unchanged,
}

/// Everything a convert-and-check loop needs between runs
pub struct RenderSession {
    settings: Settings,
    source: Option<SourceImage>,
    last: Option<RenderOutput>,
}

impl RenderSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: settings.sanitized(),
            source: None,
            last: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn set_source(&mut self, source: SourceImage) {
        self.source = Some(source);
    }

    /// Decode and store a new source image
    pub fn load_source(&mut self, path: &Path) -> Result<(), AppError> {
        self.source = Some(SourceImage::open(path)?);
        Ok(())
    }

    /// Result of the latest successful render
    pub fn last(&self) -> Option<&RenderOutput> {
        self.last.as_ref()
    }

    /// Convert the current source with the current settings and analyze the
    /// result. Skips the work when nothing changed since the last render.
    pub fn render(&mut self) -> Result<RenderOutcome, AppError> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| AppError::InvalidArgument("no source image loaded".to_string()))?;

        let pipeline = ConvertPipeline::new(self.settings.clone())?;
        let fingerprint = pipeline.fingerprint(&source.bitmap)?;

        if self
            .last
            .as_ref()
            .is_some_and(|last| last.fingerprint == fingerprint)
        {
            tracing::debug!(%fingerprint, "Render inputs unchanged");
            return Ok(RenderOutcome::Unchanged);
        }

        let converted = pipeline.run(&source.bitmap)?;
        let validation = TileValidator::new(pipeline.settings()).validate(converted.bitmap());

        self.last = Some(RenderOutput {
            fingerprint,
            converted,
            validation,
        });
        Ok(RenderOutcome::Rendered)
    }
}
