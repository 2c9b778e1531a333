//! Static tables for the French tax estimator.
//!
//! The 2026 tables ship embedded in the crate; [`TableSet::load`] swaps any
//! of them for a file named in [`TablesConfig`] and validates the result.

pub mod config;
pub mod embedded;
pub mod loader;

pub use config::{TableSet, TableSource, TablesConfig};
pub use loader::{BracketRecord, BracketSchedule, TableLoadError, TableLoader};
