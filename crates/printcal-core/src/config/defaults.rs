//! Default calibration parameter values and their sanitization.

use serde::{Deserialize, Serialize};

use crate::color::DeltaEFormula;
use crate::models::{DeviceClass, NeutralBias, RenderingIntent, Signature};

/// Non-finite values (YAML `.nan`, `.inf`) fall back to the default
#[inline]
fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// Ink response model and delta-E selection used by the patch analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Percent of cyan per unit of bias along the cyan hue direction
    pub cyan_gain: f64,
    pub magenta_gain: f64,
    pub yellow_gain: f64,
    /// Lab hue angle (degrees) each ink pushes a neutral towards when increased
    pub cyan_hue: f64,
    pub magenta_hue: f64,
    pub yellow_hue: f64,
    /// Largest per-iteration change for any channel, in percent
    pub max_step: f64,
    /// Multiplier for a channel whose suggestion reverses the prior adjustment
    pub overshoot_damping: f64,
    /// Formula for neutral patches
    pub neutral_formula: DeltaEFormula,
    /// Formula for colour patches
    pub colour_formula: DeltaEFormula,
    /// Restrict the neutral bias to these grey levels; `None` uses every neutral patch
    pub bias_levels: Option<Vec<u8>>,
}

impl AnalyzerConfig {
    pub(crate) fn sanitize(&mut self) {
        let d = Self::default();
        self.cyan_gain = finite_or(self.cyan_gain, d.cyan_gain).max(0.0);
        self.magenta_gain = finite_or(self.magenta_gain, d.magenta_gain).max(0.0);
        self.yellow_gain = finite_or(self.yellow_gain, d.yellow_gain).max(0.0);
        self.cyan_hue = finite_or(self.cyan_hue, d.cyan_hue).rem_euclid(360.0);
        self.magenta_hue = finite_or(self.magenta_hue, d.magenta_hue).rem_euclid(360.0);
        self.yellow_hue = finite_or(self.yellow_hue, d.yellow_hue).rem_euclid(360.0);
        self.max_step = finite_or(self.max_step, d.max_step).clamp(0.0, 100.0);
        self.overshoot_damping =
            finite_or(self.overshoot_damping, d.overshoot_damping).clamp(0.0, 1.0);
        if let Some(levels) = self.bias_levels.as_mut() {
            levels.sort_unstable();
            levels.dedup();
        }
    }

    pub fn gains(&self) -> [f64; 3] {
        [self.cyan_gain, self.magenta_gain, self.yellow_gain]
    }

    pub fn hues(&self) -> [f64; 3] {
        [self.cyan_hue, self.magenta_hue, self.yellow_hue]
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            cyan_gain: 1.0,
            magenta_gain: 1.0,
            yellow_gain: 1.0,
            cyan_hue: 215.0,
            magenta_hue: 350.0,
            yellow_hue: 95.0,
            max_step: 4.0,
            overshoot_damping: 0.5,
            neutral_formula: DeltaEFormula::Cie76,
            colour_formula: DeltaEFormula::Ciede2000,
            bias_levels: None,
        }
    }
}

/// Stopping criteria for the convergence tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    /// Trailing window size K
    pub window: usize,
    /// RMS delta-E below which a record counts as good
    pub metric_threshold: f64,
    /// Largest per-channel adjustment (percent) that still counts as stable
    pub small_adjustment_threshold: f64,
}

impl ConvergenceConfig {
    pub(crate) fn sanitize(&mut self) {
        let d = Self::default();
        self.window = self.window.clamp(1, 64);
        self.metric_threshold = finite_or(self.metric_threshold, d.metric_threshold).max(0.0);
        self.small_adjustment_threshold =
            finite_or(self.small_adjustment_threshold, d.small_adjustment_threshold).max(0.0);
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            window: 3,
            metric_threshold: 4.0,
            small_adjustment_threshold: 1.0,
        }
    }
}

/// Acceptable neutral bias box around a* = b* = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralTargets {
    pub a_tol: f64,
    pub b_tol: f64,
}

impl NeutralTargets {
    pub(crate) fn sanitize(&mut self) {
        let d = Self::default();
        self.a_tol = finite_or(self.a_tol, d.a_tol).abs();
        self.b_tol = finite_or(self.b_tol, d.b_tol).abs();
    }

    pub fn contains(&self, bias: NeutralBias) -> bool {
        bias.a.abs() <= self.a_tol && bias.b.abs() <= self.b_tol
    }
}

impl Default for NeutralTargets {
    fn default() -> Self {
        Self {
            a_tol: 1.5,
            b_tol: 2.0,
        }
    }
}

/// Profile synthesis and header settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub description: String,
    pub copyright: String,
    pub device_class: DeviceClass,
    pub rendering_intent: RenderingIntent,
    pub creator: Signature,
    /// Entries per curveType table
    pub curve_table_size: usize,
    /// Three-tap smoothing of the measured neutral response before the monotonic check
    pub curve_smoothing: bool,
    /// 0.0 = identity, 1.0 = full fitted correction
    pub matrix_strength: f64,
}

impl ProfileConfig {
    pub(crate) fn sanitize(&mut self) {
        self.curve_table_size = self.curve_table_size.clamp(2, 4096);
        self.matrix_strength = finite_or(self.matrix_strength, 1.0).clamp(0.0, 1.0);
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            description: "Printer calibration profile".to_string(),
            copyright: "No copyright, use freely".to_string(),
            device_class: DeviceClass::Display,
            rendering_intent: RenderingIntent::Perceptual,
            creator: Signature(*b"PCAL"),
            curve_table_size: 256,
            curve_smoothing: true,
            matrix_strength: 1.0,
        }
    }
}
