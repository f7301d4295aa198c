//! REACLIB rate model.
//!
//! `term` holds the pure evaluation of the 7-coefficient expansion so that
//! fitting code can call it with any parameter snapshot; `reaclib` holds the
//! stateful model that maps physical quantities to and from coefficients.

pub mod constants;
pub mod reaclib;
pub mod term;

pub use constants::*;
pub use reaclib::*;
pub use term::*;
