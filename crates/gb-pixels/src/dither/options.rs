//! Dithering options and configuration.

use std::fmt;
use std::str::FromStr;

/// Which dithering strategy to run before quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherMode {
    /// Plain nearest-color quantization.
    #[default]
    Off,
    /// Ordered dithering with a 4×4 Bayer matrix, then quantization.
    Bayer,
    /// Floyd-Steinberg error diffusion with inline quantization.
    Floyd,
}

impl DitherMode {
    /// The lowercase name used in settings and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            DitherMode::Off => "off",
            DitherMode::Bayer => "bayer",
            DitherMode::Floyd => "floyd",
        }
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown dither mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDitherModeError(pub String);

impl fmt::Display for ParseDitherModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown dither mode '{}' (expected off, bayer or floyd)",
            self.0
        )
    }
}

impl std::error::Error for ParseDitherModeError {}

impl FromStr for DitherMode {
    type Err = ParseDitherModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(DitherMode::Off),
            "bayer" | "ordered" => Ok(DitherMode::Bayer),
            "floyd" | "floyd-steinberg" | "fs" => Ok(DitherMode::Floyd),
            _ => Err(ParseDitherModeError(s.to_string())),
        }
    }
}

/// Configuration shared by the dithering strategies.
///
/// # Example
///
/// ```
/// use gb_pixels::DitherOptions;
///
/// let options = DitherOptions::new().strength(0.75);
/// assert_eq!(options.strength, 0.75);
///
/// // Out of range values are clamped
/// assert_eq!(DitherOptions::new().strength(3.0).strength, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherOptions {
    /// How strongly to dither, in `[0, 1]`. 0 disables dithering.
    ///
    /// Bayer scales its threshold offsets by this; Floyd-Steinberg scales
    /// the residual it diffuses.
    ///
    /// Default: `0.5`
    pub strength: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self { strength: 0.5 }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strength, clamped to `[0, 1]`. NaN becomes 0.
    #[inline]
    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = if strength.is_nan() {
            0.0
        } else {
            strength.clamp(0.0, 1.0)
        };
        self
    }

    /// True if the options would leave the image undithered.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        !(self.strength > 0.0)
    }
}
