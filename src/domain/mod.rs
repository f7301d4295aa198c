//! Domain types used throughout the tool.
//!
//! This module defines:
//!
//! - physical inputs (`ReactionSpec`, `Resonance`)
//! - rate observations (`RateSample`, `DatasetStats`)
//! - run configuration derived from CLI flags (`GridSpec`, `SeedConfig`, `ScanSpec`)
//! - fit diagnostics and the saved rate file (`FitQuality`, `RateFile`)

pub mod types;

pub use types::*;
