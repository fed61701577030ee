//! Numeric answer checking and per-problem progress.
pub mod matcher;
pub mod tracker;

pub use matcher::{DEFAULT_TOLERANCE, check_numeric_match};
pub use tracker::{Progress, ProgressTracker};
