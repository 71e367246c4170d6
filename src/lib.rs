//! gbtile - 4-color retro console image converter and tile validator.
//!
//! The pixel algorithms live in `gb-pixels`; this crate adds decoding,
//! geometry, PNG export, configuration, reports and the watch loop.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
