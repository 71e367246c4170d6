//! Tone adjustment options.

/// Smallest gamma the curve will use. Zero or negative gamma is raised to this.
pub const MIN_GAMMA: f32 = 1e-4;

/// Brightness, contrast and gamma for [`ColorAdjuster`](super::ColorAdjuster).
///
/// # Defaults
///
/// All three are neutral: brightness 0, contrast 0, gamma 1.
///
/// # Example
///
/// ```
/// use gb_pixels::PreprocessOptions;
///
/// let options = PreprocessOptions::new()
///     .brightness(-20.0)
///     .contrast(35.0)
///     .gamma(1.4);
/// assert!(!options.is_identity());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessOptions {
    /// Additive brightness, roughly -100..100. Each unit adds 2.55 to a channel.
    pub brightness: f32,

    /// Contrast, roughly -100..100. 0 leaves the image unchanged.
    pub contrast: f32,

    /// Gamma exponent denominator. Values above 1 lighten midtones.
    pub gamma: f32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            gamma: 1.0,
        }
    }
}

impl PreprocessOptions {
    /// Create neutral options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set brightness.
    #[inline]
    pub fn brightness(mut self, value: f32) -> Self {
        self.brightness = value;
        self
    }

    /// Set contrast.
    #[inline]
    pub fn contrast(mut self, value: f32) -> Self {
        self.contrast = value;
        self
    }

    /// Set gamma. Degenerate values are floored when the curve is built,
    /// not here.
    #[inline]
    pub fn gamma(mut self, value: f32) -> Self {
        self.gamma = value;
        self
    }

    /// Returns a copy safe to evaluate.
    ///
    /// Non-finite brightness or contrast becomes 0, contrast is kept below the
    /// pole of the contrast factor at 259, and gamma is floored at
    /// [`MIN_GAMMA`] (non-finite gamma becomes 1).
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            brightness: finite_or(self.brightness, 0.0),
            contrast: finite_or(self.contrast, 0.0).clamp(-255.0, 258.0),
            gamma: finite_or(self.gamma, 1.0).max(MIN_GAMMA),
        }
    }

    /// True if applying these options cannot change any pixel.
    pub fn is_identity(&self) -> bool {
        let s = self.sanitized();
        s.brightness == 0.0 && s.contrast == 0.0 && s.gamma == 1.0
    }
}
