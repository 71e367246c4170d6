//! Public API for the gb-pixels crate.
//!
//! This module provides the high-level API: the [`Converter`] builder and
//! the [`GbError`] unified error type.

mod builder;
mod error;

pub use builder::Converter;
pub use error::GbError;
