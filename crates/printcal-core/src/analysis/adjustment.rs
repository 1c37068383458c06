//! Linear ink response model: neutral bias -> CMY ink deltas.
//!
//! Each ink pushes a neutral towards its hue direction in the a*b* plane when
//! increased. The bias is projected onto every ink direction and the
//! suggestion for that ink opposes the projected component.

use crate::config::AnalyzerConfig;
use crate::models::{InkAdjustment, NeutralBias};

/// Unit vector in the a*b* plane for a hue angle in degrees
#[inline]
pub fn hue_direction(hue_degrees: f64) -> [f64; 2] {
    let (sin, cos) = hue_degrees.to_radians().sin_cos();
    [cos, sin]
}

/// Portion of `bias` along each ink's hue direction, in C, M, Y order
pub fn project_bias(bias: NeutralBias, config: &AnalyzerConfig) -> [f64; 3] {
    config.hues().map(|hue| {
        let [da, db] = hue_direction(hue);
        bias.a * da + bias.b * db
    })
}

/// Suggest per-channel ink deltas that cancel `bias`.
///
/// A channel whose raw suggestion reverses the sign of the prior adjustment
/// has overshot, so it is damped before the per-iteration clamp.
pub fn suggest_adjustment(
    bias: NeutralBias,
    prior: Option<InkAdjustment>,
    config: &AnalyzerConfig,
) -> InkAdjustment {
    let components = project_bias(bias, config);
    let gains = config.gains();
    let prior = prior.map(InkAdjustment::to_array);

    let mut deltas = [0.0; 3];
    for (k, delta) in deltas.iter_mut().enumerate() {
        let mut raw = -gains[k] * components[k];
        if let Some(prior) = prior {
            if prior[k] * raw < 0.0 {
                raw *= config.overshoot_damping;
            }
        }
        *delta = clamp_step(raw, config.max_step);
    }

    InkAdjustment::from_array(deltas)
}

#[inline]
fn clamp_step(value: f64, max_step: f64) -> f64 {
    if value == 0.0 {
        // collapse -0.0
        return 0.0;
    }
    // A negative or non-finite limit allows no movement
    let limit = if max_step.is_finite() { max_step.max(0.0) } else { 0.0 };
    value.clamp(-limit, limit)
}

/// Net a*b* shift the adjustment is expected to produce under the linear model
pub fn predicted_shift(adjustment: InkAdjustment, config: &AnalyzerConfig) -> [f64; 2] {
    let hues = config.hues();
    let deltas = adjustment.to_array();
    let mut shift = [0.0; 2];
    for (delta, hue) in deltas.iter().zip(hues) {
        let [da, db] = hue_direction(hue);
        shift[0] += delta * da;
        shift[1] += delta * db;
    }
    shift
}
