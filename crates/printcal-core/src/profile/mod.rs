//! Device correction profile synthesis and ICC serialization
//!
//! # Modules
//! - `builder`: `ProfileBuilder`, tone curves plus drift matrix from a converged record
//! - `curves`: per-channel tone curves from the grey ramp
//! - `icc`: ICC v2.4 matrix/TRC encoding (display and input classes)
//! - `writer`: atomic profile file output

mod builder;
mod curves;
mod icc;
mod writer;


pub use builder::{fit_drift_matrix, ProfileBuilder};
pub use curves::{build_tone_curves, sample_curve, srgb_tone_curve};
pub use writer::{save_profile, write_profile};
