//! Rate data sources.
//!
//! - deterministic synthetic samples drawn from a known rate (`synth`)

pub mod synth;

pub use synth::*;
