//! The [`ColorAdjuster`] tone curve.

use super::options::PreprocessOptions;
use crate::bitmap::Bitmap;

/// Applies brightness, contrast and gamma to R, G and B.
///
/// The curve is evaluated once per byte value into a 256-entry table at
/// construction, so [`apply()`](ColorAdjuster::apply) is a table lookup per
/// channel.
#[derive(Debug, Clone)]
pub struct ColorAdjuster {
    options: PreprocessOptions,
    table: [u8; 256],
}

impl ColorAdjuster {
    /// Build an adjuster. Degenerate options are sanitized first, see
    /// [`PreprocessOptions::sanitized()`].
    pub fn new(options: PreprocessOptions) -> Self {
        let options = options.sanitized();
        let mut table = [0u8; 256];
        for (v, slot) in table.iter_mut().enumerate() {
            *slot = Self::curve(&options, v as f64);
        }
        Self { options, table }
    }

    /// The sanitized options in effect.
    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    // f64 throughout, and halves round to even like a clamped byte store
    fn curve(options: &PreprocessOptions, v: f64) -> u8 {
        let c = f64::from(options.contrast);
        let factor = 259.0 * (c + 255.0) / (255.0 * (259.0 - c));
        let brightness = f64::from(options.brightness) * 2.55;
        let v = (factor * (v - 128.0) + 128.0 + brightness).clamp(0.0, 255.0);
        let v = 255.0 * (v / 255.0).powf(1.0 / f64::from(options.gamma));
        v.clamp(0.0, 255.0).round_ties_even() as u8
    }

    /// Adjust a single channel value.
    #[inline]
    pub fn adjust_channel(&self, v: u8) -> u8 {
        self.table[v as usize]
    }

    /// Adjust every pixel in place. Alpha is not touched.
    pub fn apply(&self, bitmap: &mut Bitmap) {
        if self.options.is_identity() {
            return;
        }
        for px in bitmap.pixels_mut() {
            px[0] = self.table[px[0] as usize];
            px[1] = self.table[px[1] as usize];
            px[2] = self.table[px[2] as usize];
        }
    }
}

impl Default for ColorAdjuster {
    fn default() -> Self {
        Self::new(PreprocessOptions::default())
    }
}
