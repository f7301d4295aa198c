//! Fitting support around the rate model.
//!
//! The minimizer itself is external. This module supplies what a
//! least-squares engine needs from the model and a few REACLIB-specific helpers:
//!
//! - `adapter`: the `FitFunction` seam, the chi-square objective and quality metrics
//! - `free`: mapping between the full coefficient vector and its free subset
//! - `seed`: linearized least-squares seeding of a single term
//! - `scan`: resonance-energy grid scan (parallel)

pub mod adapter;
pub mod free;
pub mod scan;
pub mod seed;

pub use adapter::*;
pub use free::*;
pub use scan::*;
pub use seed::*;
