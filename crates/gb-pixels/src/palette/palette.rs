//! Palette struct with nearest-color matching.
//!
//! The palette is the four shades the target console can display. Matching
//! uses squared Euclidean distance over raw RGB bytes, with ties going to the
//! entry declared first.

use std::collections::HashSet;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::Rgba;

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 4;

/// The classic handheld green ramp, darkest first.
const DMG_GREENS: [Rgba; PALETTE_SIZE] = [
    Rgba::opaque(0x07, 0x18, 0x21),
    Rgba::opaque(0x30, 0x68, 0x50),
    Rgba::opaque(0x86, 0xc0, 0x6c),
    Rgba::opaque(0xe0, 0xf8, 0xcf),
];

/// An ordered set of exactly four distinct opaque colors.
///
/// The declaration order matters: it is the tie-break order for
/// [`find_nearest()`](Palette::find_nearest) and the index order used when
/// the output is exported as an indexed image.
///
/// # Example
///
/// ```
/// use gb_pixels::{Palette, Rgba};
///
/// let palette = Palette::dmg();
/// assert_eq!(palette.len(), 4);
/// assert_eq!(palette.nearest(Rgba::opaque(255, 0, 0)), Rgba::opaque(0x30, 0x68, 0x50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgba; PALETTE_SIZE],
}

impl Palette {
    /// Create a palette from four colors.
    ///
    /// Alpha is ignored; entries are stored opaque.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::WrongSize`] unless exactly four colors are given
    /// - [`PaletteError::DuplicateColor`] if two entries share the same RGB
    pub fn new(colors: &[Rgba]) -> Result<Self, PaletteError> {
        if colors.len() != PALETTE_SIZE {
            return Err(PaletteError::WrongSize {
                expected: PALETTE_SIZE,
                actual: colors.len(),
            });
        }

        let mut seen = HashSet::new();
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(color.rgb()) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        let mut stored = [Rgba::default(); PALETTE_SIZE];
        for (slot, color) in stored.iter_mut().zip(colors) {
            *slot = color.to_opaque();
        }
        Ok(Self { colors: stored })
    }

    /// The default four-shade green palette.
    pub fn dmg() -> Self {
        Self { colors: DMG_GREENS }
    }

    /// Create a palette from hex color strings such as `"#306850"`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] for an unparsable entry, or the
    /// validation errors of [`Palette::new()`].
    ///
    /// ```
    /// use gb_pixels::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000", "#555", "#aaa", "#fff"]).unwrap();
    /// assert_eq!(palette.len(), 4);
    /// ```
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .map(|s| Rgba::from_str(s.as_ref()).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        Palette::new(&colors)
    }

    /// Returns the number of colors in the palette (always 4).
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len()`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get the color at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= 4`.
    #[inline]
    pub fn color(&self, idx: usize) -> Rgba {
        self.colors[idx]
    }

    /// All entries in declaration order.
    #[inline]
    pub fn colors(&self) -> &[Rgba; PALETTE_SIZE] {
        &self.colors
    }

    /// Index of the entry whose RGB is byte-identical to `color`, if any.
    /// Alpha is not compared.
    #[inline]
    pub fn index_of(&self, color: Rgba) -> Option<usize> {
        let rgb = color.rgb();
        self.colors.iter().position(|c| c.rgb() == rgb)
    }

    /// Returns true if `color`'s RGB is exactly one of the entries.
    #[inline]
    pub fn contains(&self, color: Rgba) -> bool {
        self.index_of(color).is_some()
    }

    /// Find the entry nearest to an RGB triple.
    ///
    /// Channels are floats so error-diffused values can be matched without
    /// rounding first. Returns `(index, squared_distance)`. Ties go to the
    /// lowest index: a later entry must be strictly closer to win.
    #[inline]
    pub fn find_nearest(&self, rgb: [f32; 3]) -> (usize, f32) {
        let mut best_idx = 0;
        let mut best_dist = f32::INFINITY;

        for (i, entry) in self.colors.iter().enumerate() {
            let dr = rgb[0] - entry.r as f32;
            let dg = rgb[1] - entry.g as f32;
            let db = rgb[2] - entry.b as f32;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        (best_idx, best_dist)
    }

    /// Quantize a color to its nearest entry (always opaque).
    #[inline]
    pub fn nearest(&self, color: Rgba) -> Rgba {
        let (idx, _) = self.find_nearest([color.r as f32, color.g as f32, color.b as f32]);
        self.colors[idx]
    }

    /// The lightest entry by channel sum, the conventional background shade.
    /// Ties go to the later entry.
    pub fn lightest(&self) -> Rgba {
        let mut best = self.colors[0];
        for &c in &self.colors[1..] {
            let sum = |x: Rgba| x.r as u32 + x.g as u32 + x.b as u32;
            if sum(c) >= sum(best) {
                best = c;
            }
        }
        best
    }

    /// Entries as lowercase `#rrggbb` strings.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dmg()
    }
}
