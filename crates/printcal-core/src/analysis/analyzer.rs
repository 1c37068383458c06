//! Patch analyzer: one measurement set in, one analysis record out.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::adjustment::suggest_adjustment;
use super::neutral::neutral_bias;
use super::reference::reference_lab;
use crate::color::DeltaEFormula;
use crate::config::AnalyzerConfig;
use crate::error::{CalibrationError, Result};
use crate::models::{AnalysisRecord, InkAdjustment, PatchDeltaE, PatchMeasurement};

/// Stateless analyzer parameterised by its configuration section
#[derive(Debug, Clone, Default)]
pub struct PatchAnalyzer {
    config: AnalyzerConfig,
}

impl PatchAnalyzer {
    pub fn new(mut config: AnalyzerConfig) -> Self {
        config.sanitize();
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Formula used for a patch: neutral patches and colour patches are configured separately
    pub fn formula_for(&self, patch: &PatchMeasurement) -> DeltaEFormula {
        if patch.is_neutral() {
            self.config.neutral_formula
        } else {
            self.config.colour_formula
        }
    }

    /// Analyze one measurement set.
    ///
    /// Fails with `InsufficientData` for an empty set and with `Domain` when a
    /// patch carries an invalid Lab value.
    pub fn analyze(
        &self,
        patches: &[PatchMeasurement],
        prior_adjustment: Option<InkAdjustment>,
    ) -> Result<AnalysisRecord> {
        self.analyze_at(patches, prior_adjustment, None)
    }

    /// Same as [`analyze`](Self::analyze), stamping the record with its measurement time
    pub fn analyze_at(
        &self,
        patches: &[PatchMeasurement],
        prior_adjustment: Option<InkAdjustment>,
        measured_at: Option<DateTime<Utc>>,
    ) -> Result<AnalysisRecord> {
        if patches.is_empty() {
            return Err(CalibrationError::InsufficientData(
                "at least one patch measurement is required".to_string(),
            ));
        }

        let mut per_patch_delta_e = Vec::with_capacity(patches.len());
        let mut sum_sq = 0.0;

        for patch in patches {
            patch.lab.validate().map_err(|err| match err {
                CalibrationError::Domain(msg) => {
                    CalibrationError::Domain(format!("patch {}: {}", patch.id, msg))
                }
                other => other,
            })?;

            let formula = self.formula_for(patch);
            let delta_e = formula.compute(reference_lab(patch.nominal), patch.lab);
            sum_sq += delta_e * delta_e;
            per_patch_delta_e.push(PatchDeltaE {
                id: patch.id.clone(),
                delta_e,
                formula,
            });
        }

        let overall_metric = (sum_sq / patches.len() as f64).sqrt();
        let (bias, neutral_count) = neutral_bias(patches, self.config.bias_levels.as_deref());
        let suggested_adjustment = suggest_adjustment(bias, prior_adjustment, &self.config);

        debug!(
            patches = patches.len(),
            neutral = neutral_count,
            a_bias = bias.a,
            b_bias = bias.b,
            rms_delta_e = overall_metric,
            "Analyzed measurement set"
        );

        Ok(AnalysisRecord {
            patches: patches.to_vec(),
            per_patch_delta_e,
            neutral_bias: bias,
            neutral_count,
            suggested_adjustment,
            prior_adjustment,
            overall_metric,
            measured_at,
        })
    }
}
