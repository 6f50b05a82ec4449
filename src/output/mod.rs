//! Output module for persisting and reporting harvest results
//!
//! This module handles:
//! - Writing and reading the JSON snapshot consumed by the web front end
//! - Building and printing run statistics

mod snapshot;
pub mod stats;

pub use snapshot::{load_snapshot, save_snapshot};
pub use stats::{print_statistics, HarvestStatistics};
