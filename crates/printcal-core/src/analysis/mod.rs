//! Patch analysis
//!
//! Turns one measurement set into an [`AnalysisRecord`](crate::models::AnalysisRecord):
//! per-patch delta-E against the reference chart, the neutral bias, and a
//! suggested gross ink correction.
//!
//! # Modules
//! - `analyzer`: the `PatchAnalyzer` entry point
//! - `adjustment`: ink response model
//! - `neutral`: neutral bias and grey-ramp diagnostics
//! - `reference`: reference chart and expected colours

mod adjustment;
mod analyzer;
mod neutral;
mod reference;


pub use adjustment::{hue_direction, predicted_shift, project_bias, suggest_adjustment};
pub use analyzer::PatchAnalyzer;
pub use neutral::{check_neutral_slope, neutral_bias, neutral_levels, NeutralLevel, SlopeReport};
pub use reference::{reference_lab, reference_patch, ReferencePatch, REFERENCE_CHART};
