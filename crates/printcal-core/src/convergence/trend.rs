//! Read-only trend export for plotting collaborators.

use serde::Serialize;

use super::tracker::ConvergenceState;

/// Per-iteration series, one entry per appended record
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TrendSeries {
    pub overall_metric: Vec<f64>,
    pub a_bias: Vec<f64>,
    pub b_bias: Vec<f64>,
    pub cyan: Vec<f64>,
    pub magenta: Vec<f64>,
    pub yellow: Vec<f64>,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.overall_metric.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overall_metric.is_empty()
    }
}

impl ConvergenceState {
    pub fn trend(&self) -> TrendSeries {
        let mut series = TrendSeries::default();
        for record in self.history() {
            series.overall_metric.push(record.overall_metric);
            series.a_bias.push(record.neutral_bias.a);
            series.b_bias.push(record.neutral_bias.b);
            series.cyan.push(record.suggested_adjustment.cyan);
            series.magenta.push(record.suggested_adjustment.magenta);
            series.yellow.push(record.suggested_adjustment.yellow);
        }
        series
    }

    /// Full state (history, status) as pretty JSON
    pub fn history_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
