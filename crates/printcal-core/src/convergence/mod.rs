//! Convergence tracking across calibration iterations
//!
//! Consumes analysis records in iteration order and decides when measurements
//! have stabilised (or are getting worse).

mod tracker;
mod trend;

#[cfg(test)]
mod tests;

pub use tracker::{ConvergenceState, ConvergenceStatus, ConvergenceTracker};
pub use trend::TrendSeries;
