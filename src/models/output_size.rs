use crate::error::AppError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Smallest edge a converted image may have
pub const MIN_EDGE: u32 = 16;

/// Largest edge a converted image may have
pub const MAX_EDGE: u32 = 1024;

/// Target canvas size for a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl OutputSize {
    /// Original handheld screen: 160x144
    pub const DMG: Self = Self {
        width: 160,
        height: 144,
    };

    /// Color handheld wide mode: 256x224
    pub const WIDE: Self = Self {
        width: 256,
        height: 224,
    };

    /// Build a size with each side clamped to [`MIN_EDGE`, `MAX_EDGE`]
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(MIN_EDGE, MAX_EDGE),
            height: height.clamp(MIN_EDGE, MAX_EDGE),
        }
    }

    /// Parse a `WxH` preset string such as `160x144`.
    ///
    /// The result is clamped like a custom size.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        static PRESET: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
        let re = PRESET
            .get_or_init(|| Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$"))
            .as_ref()
            .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

        let caps = re
            .captures(value)
            .ok_or_else(|| AppError::InvalidArgument(format!("size '{value}' is not WxH")))?;
        let width = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        let height = caps[2].parse::<u32>().unwrap_or(u32::MAX);
        Ok(Self::clamped(width, height))
    }

    /// Fix the width and derive the height from `aspect` (width / height)
    pub fn from_width(width: u32, aspect: f64) -> Self {
        let width = width.clamp(MIN_EDGE, MAX_EDGE);
        let height = derive_edge(width as f64 / sanitize_aspect(aspect));
        Self { width, height }
    }

    /// Fix the height and derive the width from `aspect` (width / height)
    pub fn from_height(height: u32, aspect: f64) -> Self {
        let height = height.clamp(MIN_EDGE, MAX_EDGE);
        let width = derive_edge(height as f64 * sanitize_aspect(aspect));
        Self { width, height }
    }

    /// Width divided by height
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// How the caller asked for the output size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeRequest {
    /// Both sides given (preset or `WxH`)
    Exact(OutputSize),
    /// Width given, height follows the aspect
    Width(u32),
    /// Height given, width follows the aspect
    Height(u32),
}

impl SizeRequest {
    /// Resolve against the crop aspect, or the source aspect for a free crop
    pub fn resolve(self, crop_aspect: Option<f64>, src_width: usize, src_height: usize) -> OutputSize {
        let aspect = crop_aspect.unwrap_or(src_width as f64 / src_height.max(1) as f64);
        match self {
            SizeRequest::Exact(size) => OutputSize::clamped(size.width, size.height),
            SizeRequest::Width(width) => OutputSize::from_width(width, aspect),
            SizeRequest::Height(height) => OutputSize::from_height(height, aspect),
        }
    }
}

impl Default for OutputSize {
    fn default() -> Self {
        Self::DMG
    }
}

impl std::fmt::Display for OutputSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        OutputSize::DMG.aspect()
    }
}

fn derive_edge(value: f64) -> u32 {
    (value.round() as u32).clamp(MIN_EDGE, MAX_EDGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preset() {
        assert_eq!(OutputSize::parse("160x144").unwrap(), OutputSize::DMG);
        assert_eq!(OutputSize::parse(" 256X224 ").unwrap(), OutputSize::WIDE);
    }

    #[test]
    fn test_parse_clamps() {
        let size = OutputSize::parse("4x5000").unwrap();
        assert_eq!(size, OutputSize::clamped(16, 1024));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(OutputSize::parse("large").is_err());
        assert!(OutputSize::parse("160x").is_err());
        assert!(OutputSize::parse("-160x144").is_err());
    }

    #[test]
    fn test_from_width_follows_aspect() {
        let size = OutputSize::from_width(160, 4.0 / 3.0);
        assert_eq!(size, OutputSize { width: 160, height: 120 });
    }

    #[test]
    fn test_from_height_follows_aspect() {
        let size = OutputSize::from_height(144, 2.0);
        assert_eq!(size, OutputSize { width: 288, height: 144 });
    }

    #[test]
    fn test_derived_edge_floored() {
        // A very wide aspect would give a 1px height
        let size = OutputSize::from_width(100, 50.0);
        assert_eq!(size.height, MIN_EDGE);
    }

    #[test]
    fn test_derived_edge_capped() {
        let size = OutputSize::from_height(1024, 8.0);
        assert_eq!(size.width, MAX_EDGE);
    }

    #[test]
    fn test_bad_aspect_falls_back() {
        let size = OutputSize::from_width(160, f64::NAN);
        assert_eq!(size, OutputSize::DMG);
    }

    #[test]
    fn test_size_request_follows_crop_then_source() {
        let by_crop = SizeRequest::Width(160).resolve(Some(1.0), 400, 100);
        assert_eq!(by_crop, OutputSize::clamped(160, 160));

        let by_source = SizeRequest::Width(160).resolve(None, 400, 100);
        assert_eq!(by_source, OutputSize { width: 160, height: 40 });

        let by_height = SizeRequest::Height(100).resolve(None, 400, 100);
        assert_eq!(by_height, OutputSize { width: 400, height: 100 });
    }

    #[test]
    fn test_size_request_exact_ignores_aspect() {
        let size = SizeRequest::Exact(OutputSize::DMG).resolve(Some(3.0), 10, 10);
        assert_eq!(size, OutputSize::DMG);
    }

    #[test]
    fn test_display() {
        assert_eq!(OutputSize::DMG.to_string(), "160x144");
    }
}
