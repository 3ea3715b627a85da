//! Network Double Auction Sweep
//!
//! Varies one market parameter over a range, runs independent seeded
//! trials at every point and appends the averaged welfare ratios
//! (optimal, static MTR, DTR) to a whitespace-delimited table.

pub mod config;
pub mod driver;
pub mod error;
pub mod table;

// Re-export main types
pub use config::{Step, SweepConfig, SweepParameter};
pub use driver::{SweepRunner, run_trial, trial_seed};
pub use error::{SweepError, SweepResult};
pub use table::ResultTable;
