//! One printer's calibration loop: analyze, track, and finally export.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analysis::{check_neutral_slope, PatchAnalyzer, SlopeReport};
use crate::config::{CalibrationConfig, NeutralTargets};
use crate::convergence::{ConvergenceStatus, ConvergenceTracker};
use crate::error::{CalibrationError, Result};
use crate::models::{AnalysisRecord, ColorProfile, InkAdjustment, NeutralBias, PatchMeasurement};
use crate::profile::ProfileBuilder;

/// Summary of one submitted measurement set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationOutcome {
    /// 1-based iteration number
    pub iteration: usize,
    pub status: ConvergenceStatus,
    pub overall_metric: f64,
    pub max_delta_e: f64,
    pub neutral_bias: NeutralBias,
    pub suggested_adjustment: InkAdjustment,
    /// Neutral bias lies inside the configured a*/b* box
    pub within_tolerance: bool,
    pub slope: SlopeReport,
}

/// Built profile together with its ICC encoding
#[derive(Debug, Clone)]
pub struct ExportedProfile {
    pub profile: ColorProfile,
    pub icc: Vec<u8>,
}

/// Owns the tracker for a single printer. Sessions share nothing.
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    analyzer: PatchAnalyzer,
    tracker: ConvergenceTracker,
    builder: ProfileBuilder,
    targets: NeutralTargets,
}

impl CalibrationSession {
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            analyzer: PatchAnalyzer::new(config.analyzer.clone()),
            tracker: ConvergenceTracker::new(config.convergence.clone()),
            builder: ProfileBuilder::new(config.profile.clone()),
            targets: config.targets.clone(),
        }
    }

    pub fn tracker(&self) -> &ConvergenceTracker {
        &self.tracker
    }

    pub fn status(&self) -> ConvergenceStatus {
        self.tracker.status()
    }

    /// Analyze a measurement set using the previous suggestion as the prior
    /// adjustment, then record it.
    pub fn submit(
        &mut self,
        patches: &[PatchMeasurement],
        measured_at: Option<DateTime<Utc>>,
    ) -> Result<IterationOutcome> {
        let prior = self
            .tracker
            .history()
            .last()
            .map(|record| record.suggested_adjustment);
        let record = self.analyzer.analyze_at(patches, prior, measured_at)?;
        let slope = check_neutral_slope(patches);

        let outcome = IterationOutcome {
            iteration: self.tracker.history().len() + 1,
            status: ConvergenceStatus::Continue,
            overall_metric: record.overall_metric,
            max_delta_e: record.max_delta_e(),
            neutral_bias: record.neutral_bias,
            suggested_adjustment: record.suggested_adjustment,
            within_tolerance: self.targets.contains(record.neutral_bias),
            slope,
        };
        let status = self.tracker.append(record)?;

        info!(
            iteration = outcome.iteration,
            status = %status,
            metric = outcome.overall_metric,
            within_tolerance = outcome.within_tolerance,
            "Calibration iteration recorded"
        );
        Ok(IterationOutcome { status, ..outcome })
    }

    /// The record that decided convergence; later sticky appends are ignored
    pub fn converged_record(&self) -> Option<&AnalysisRecord> {
        let state = self.tracker.state();
        if state.status() != ConvergenceStatus::Converged {
            return None;
        }
        state
            .decided_at()
            .and_then(|iteration| state.history().get(iteration.checked_sub(1)?))
    }

    /// Build and encode the profile once the loop has converged
    pub fn export_profile(&self) -> Result<ExportedProfile> {
        let status = self.tracker.status();
        let record = match self.converged_record() {
            Some(record) => record,
            None if self.tracker.history().is_empty() => {
                return Err(CalibrationError::InsufficientData(
                    "no iterations have been submitted".to_string(),
                ))
            }
            None => return Err(CalibrationError::NotConverged(status)),
        };
        let profile = self.builder.build(record, status)?;
        let icc = self.builder.serialize(&profile)?;
        Ok(ExportedProfile { profile, icc })
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}
