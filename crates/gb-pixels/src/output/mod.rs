//! Output types for the conversion pipeline.
//!
//! [`Converted`] owns the final four-color bitmap together with the palette
//! it was built against, and offers it in two forms:
//!
//! - **RGBA** ([`Converted::bitmap`]): the pixels as produced
//! - **Indexed** ([`Converted::indices`]): one palette index per pixel, for
//!   indexed-color export

mod converted;

pub use converted::Converted;
