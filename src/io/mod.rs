//! Input/output helpers.
//!
//! - CSV ingest of rate samples (`ingest`)
//! - rate table and sample exports (`export`)
//! - rate file JSON read/write (`rate_file`)

pub mod export;
pub mod ingest;
pub mod rate_file;

pub use export::*;
pub use ingest::*;
pub use rate_file::*;
