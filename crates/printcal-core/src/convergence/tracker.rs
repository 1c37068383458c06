//! Convergence state machine over the sequence of analysis records.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ConvergenceConfig;
use crate::error::{CalibrationError, Result};
use crate::models::AnalysisRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConvergenceStatus {
    /// Keep iterating
    #[default]
    Continue,

    /// Metric and adjustments stable over the trailing window (terminal)
    Converged,

    /// Metric worsened over the trailing window (terminal)
    Diverged,
}

impl ConvergenceStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Continue => "CONTINUE",
            Self::Converged => "CONVERGED",
            Self::Diverged => "DIVERGED",
        }
    }
}

impl fmt::Display for ConvergenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only iteration history plus the current decision
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConvergenceState {
    history: Vec<AnalysisRecord>,
    status: ConvergenceStatus,
    /// Iteration (1-based) at which the terminal status was first reached
    decided_at: Option<usize>,
}

impl ConvergenceState {
    pub fn history(&self) -> &[AnalysisRecord] {
        &self.history
    }

    pub fn iteration_count(&self) -> usize {
        self.history.len()
    }

    pub fn status(&self) -> ConvergenceStatus {
        self.status
    }

    pub fn decided_at(&self) -> Option<usize> {
        self.decided_at
    }

    pub fn latest(&self) -> Option<&AnalysisRecord> {
        self.history.last()
    }
}

/// Decides CONTINUE / CONVERGED / DIVERGED from the trailing window of records.
///
/// One tracker per calibration session. Terminal states are sticky: later
/// appends are kept for the audit log, but only [`reset`](Self::reset) returns
/// the tracker to CONTINUE.
#[derive(Debug, Clone, Default)]
pub struct ConvergenceTracker {
    config: ConvergenceConfig,
    state: ConvergenceState,
}

impl ConvergenceTracker {
    pub fn new(mut config: ConvergenceConfig) -> Self {
        config.sanitize();
        Self {
            config,
            state: ConvergenceState::default(),
        }
    }

    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }

    pub fn state(&self) -> &ConvergenceState {
        &self.state
    }

    pub fn status(&self) -> ConvergenceStatus {
        self.state.status
    }

    pub fn history(&self) -> &[AnalysisRecord] {
        &self.state.history
    }

    /// Append the next iteration's record and return the resulting status.
    ///
    /// Fails with `Sequence` if the record's metric is NaN or infinite, or if
    /// its timestamp precedes the previous record's.
    pub fn append(&mut self, record: AnalysisRecord) -> Result<ConvergenceStatus> {
        if !record.overall_metric.is_finite() {
            return Err(CalibrationError::Sequence(format!(
                "overall metric {} is not finite (corrupt measurement?)",
                record.overall_metric
            )));
        }

        if let (Some(previous), Some(current)) = (
            self.state.latest().and_then(|last| last.measured_at),
            record.measured_at,
        ) {
            if current < previous {
                return Err(CalibrationError::Sequence(format!(
                    "record measured at {} precedes previous record measured at {}",
                    current.to_rfc3339(),
                    previous.to_rfc3339()
                )));
            }
        }

        self.state.history.push(record);
        let iteration = self.state.history.len();

        if self.state.status.is_terminal() {
            debug!(
                iteration,
                status = %self.state.status,
                "Record appended after terminal status"
            );
            return Ok(self.state.status);
        }

        let status = self.evaluate();
        if status.is_terminal() {
            info!(iteration, status = %status, "Calibration reached terminal status");
            self.state.decided_at = Some(iteration);
        } else {
            debug!(iteration, "Calibration continues");
        }
        self.state.status = status;
        Ok(status)
    }

    /// Clear history and return to CONTINUE
    pub fn reset(&mut self) {
        self.state = ConvergenceState::default();
    }

    fn evaluate(&self) -> ConvergenceStatus {
        if self.is_converged() {
            ConvergenceStatus::Converged
        } else if self.is_diverged() {
            ConvergenceStatus::Diverged
        } else {
            ConvergenceStatus::Continue
        }
    }

    /// Every record in the last K has a metric under threshold and only small adjustments
    fn is_converged(&self) -> bool {
        let Some(window) = self.trailing(self.config.window) else {
            return false;
        };
        window.iter().all(|record| {
            record.overall_metric < self.config.metric_threshold
                && record.suggested_adjustment.max_abs() < self.config.small_adjustment_threshold
        })
    }

    /// The last K metrics are strictly increasing; a window of one still needs
    /// two records to show an increase
    fn is_diverged(&self) -> bool {
        let Some(window) = self.trailing(self.config.window.max(2)) else {
            return false;
        };
        window
            .windows(2)
            .all(|pair| pair[1].overall_metric > pair[0].overall_metric)
    }

    fn trailing(&self, k: usize) -> Option<&[AnalysisRecord]> {
        let history = &self.state.history;
        if k == 0 || history.len() < k {
            return None;
        }
        Some(&history[history.len() - k..])
    }
}
