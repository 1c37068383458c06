//! Per-iteration analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::measurement::{PatchId, PatchMeasurement};
use crate::color::DeltaEFormula;

/// Signed ink deltas in percent; positive means "add ink"
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InkAdjustment {
    pub cyan: f64,
    pub magenta: f64,
    pub yellow: f64,
}

impl InkAdjustment {
    pub const ZERO: Self = Self {
        cyan: 0.0,
        magenta: 0.0,
        yellow: 0.0,
    };

    pub fn new(cyan: f64, magenta: f64, yellow: f64) -> Self {
        Self {
            cyan,
            magenta,
            yellow,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.cyan, self.magenta, self.yellow]
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Largest absolute per-channel delta
    pub fn max_abs(&self) -> f64 {
        self.cyan.abs().max(self.magenta.abs()).max(self.yellow.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.max_abs() == 0.0
    }
}

/// Mean chromatic deviation of the neutral patches from a* = b* = 0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NeutralBias {
    pub a: f64,
    pub b: f64,
}

impl NeutralBias {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

/// Colour difference of one patch against its reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchDeltaE {
    pub id: PatchId,
    pub delta_e: f64,
    pub formula: DeltaEFormula,
}

/// Result of analysing one measurement set. Built once by the analyzer and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Measurements in input order
    pub patches: Vec<PatchMeasurement>,

    /// Delta-E per patch, same order as `patches`
    pub per_patch_delta_e: Vec<PatchDeltaE>,

    pub neutral_bias: NeutralBias,

    /// Number of neutral patches that contributed to `neutral_bias`
    pub neutral_count: usize,

    pub suggested_adjustment: InkAdjustment,

    /// Adjustment applied before this print, if any
    pub prior_adjustment: Option<InkAdjustment>,

    /// RMS of all per-patch delta-E values
    pub overall_metric: f64,

    /// When the chart was measured; used to verify iteration order
    pub measured_at: Option<DateTime<Utc>>,
}

impl AnalysisRecord {
    pub fn delta_e_for(&self, id: &PatchId) -> Option<f64> {
        self.per_patch_delta_e
            .iter()
            .find(|entry| &entry.id == id)
            .map(|entry| entry.delta_e)
    }

    pub fn neutral_patches(&self) -> impl Iterator<Item = &PatchMeasurement> {
        self.patches.iter().filter(|p| p.is_neutral())
    }

    pub fn colour_patches(&self) -> impl Iterator<Item = &PatchMeasurement> {
        self.patches.iter().filter(|p| !p.is_neutral())
    }

    /// Largest per-patch delta-E
    pub fn max_delta_e(&self) -> f64 {
        self.per_patch_delta_e
            .iter()
            .map(|entry| entry.delta_e)
            .fold(0.0, f64::max)
    }
}
