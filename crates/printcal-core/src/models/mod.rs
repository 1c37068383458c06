//! Data models for printcal
//!
//! Measurement records, per-iteration analysis results and the device
//! correction profile.

mod analysis;
mod measurement;
mod profile;

#[cfg(test)]
mod tests;

pub use analysis::{AnalysisRecord, InkAdjustment, NeutralBias, PatchDeltaE};

pub use measurement::{Nominal, PatchId, PatchMeasurement};

pub use profile::{
    Channel, ColorProfile, CurvePoint, DeviceClass, ProfileMetadata, RenderingIntent, Signature,
    ToneCurve,
};
