//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry is a neighbor offset `(dx, dy)` and a weight. A neighbor
/// receives `error * weight / divisor`. Neighbors that fall outside the
/// bitmap are skipped and their share of the error is lost.
///
/// # Buffer Sizing
///
/// `max_dy` is how many rows ahead the kernel reaches; the error buffer
/// keeps `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries.
    ///
    /// - `dx`: horizontal offset (positive = right)
    /// - `dy`: vertical offset (never negative)
    /// - `weight`: numerator of the share of error sent to this neighbor
    pub entries: &'static [(i32, i32, u8)],

    /// Denominator shared by all weights.
    pub divisor: u8,

    /// Maximum dy value in entries.
    pub max_dy: usize,
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};
