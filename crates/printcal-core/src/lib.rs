//! Printcal Core Library
//!
//! Colorimetric analysis, convergence tracking and ICC profile synthesis for
//! iterative printer calibration.

pub mod analysis;
pub mod color;
pub mod config;
pub mod convergence;
pub mod error;
pub mod models;
pub mod profile;
pub mod session;

// Re-export commonly used types
pub use analysis::PatchAnalyzer;
pub use color::{DeltaEFormula, Lab, Xyz};
pub use config::{load_calibration_config, CalibrationConfig};
pub use convergence::{ConvergenceState, ConvergenceStatus, ConvergenceTracker};
pub use error::{CalibrationError, Result};
pub use models::{
    AnalysisRecord, Channel, ColorProfile, InkAdjustment, NeutralBias, Nominal, PatchId,
    PatchMeasurement, ToneCurve,
};
pub use profile::ProfileBuilder;
pub use session::{CalibrationSession, ExportedProfile, IterationOutcome};
