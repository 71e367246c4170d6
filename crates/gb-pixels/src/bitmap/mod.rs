//! Owned RGBA8 pixel grids.
//!
//! A [`Bitmap`] is moved from stage to stage; no two stages hold the same
//! buffer at once.

mod bitmap;
mod error;

pub use bitmap::Bitmap;
pub use error::BitmapError;
