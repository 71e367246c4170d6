//! 8-bit RGBA pixel type
//!
//! [`Rgba`] is the unit of storage for [`Bitmap`](crate::Bitmap) and the
//! entry type of [`Palette`](crate::Palette). Parsing from hex strings lives
//! here so palettes can be configured from text.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// A single pixel with four 8-bit channels.
///
/// By the time quantization runs every pixel is fully opaque; the alpha
/// channel only carries information between decoding and grid normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, the content of unused tileset cells.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    ///
    /// # Example
    /// ```
    /// use gb_pixels::Rgba;
    /// let red = Rgba::opaque(255, 0, 0);
    /// assert_eq!(red.a, 255);
    /// ```
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color from a byte array `[R, G, B, A]`.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Convert to a byte array `[R, G, B, A]`.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// The color channels without alpha.
    #[inline]
    pub const fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// The same color with alpha forced to 255.
    #[inline]
    pub const fn to_opaque(self) -> Self {
        Self::opaque(self.r, self.g, self.b)
    }

    /// Returns true if alpha is 255.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Lowercase `#rrggbb` form, dropping alpha.
    ///
    /// ```
    /// use gb_pixels::Rgba;
    /// assert_eq!(Rgba::opaque(0x30, 0x68, 0x50).to_hex(), "#306850");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}{:02x}", self.to_hex(), self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Parse an opaque color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`, case-insensitive,
    /// with surrounding whitespace trimmed.
    ///
    /// ```
    /// use gb_pixels::Rgba;
    ///
    /// let green: Rgba = "#86c06c".parse().unwrap();
    /// assert_eq!(green, Rgba::opaque(0x86, 0xc0, 0x6c));
    ///
    /// let white: Rgba = "FFF".parse().unwrap();
    /// assert_eq!(white, Rgba::opaque(255, 255, 255));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::NonAscii);
        }

        match s.len() {
            3 => {
                // Shorthand: 0xF -> 0xFF
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::opaque(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::opaque(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
