//! `reaclib-fit` library crate.
//!
//! A REACLIB thermonuclear reaction rate model: a sum of 7-coefficient terms
//! (one non-resonant, one per narrow resonance) seeded from physical inputs
//! and handed to a fitter through a fixed/free parameter interface.
//!
//! The binary (`reaclib`) is a thin wrapper around this library so that the
//! model and seeding logic stay testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
