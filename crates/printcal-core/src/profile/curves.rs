//! Tone curve construction from the measured grey ramp.
//!
//! Each neutral level's measurement is converted to linear device RGB, giving
//! the per-channel response of the printer at that level. Channel differences
//! at the same level are the residual cast; a CMM inverting these curves
//! corrects it. Curves must be strictly increasing to be invertible.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::analysis::NeutralLevel;
use crate::color::{lab_to_linear_rgb, srgb_to_linear, Lab};
use crate::error::{CalibrationError, Result};
use crate::models::{Channel, CurvePoint, ToneCurve};

/// Samples used for the fallback sRGB curve
const DEFAULT_CURVE_POINTS: usize = 17;

/// Ideal sRGB device response, used when the grey ramp is too short to measure one
pub fn srgb_tone_curve() -> ToneCurve {
    let last = (DEFAULT_CURVE_POINTS - 1) as f64;
    ToneCurve::new(
        (0..DEFAULT_CURVE_POINTS)
            .map(|i| {
                let x = i as f64 / last;
                CurvePoint::new(x, srgb_to_linear(x))
            })
            .collect(),
    )
}

/// Build per-channel tone curves from neutral levels sorted ascending.
///
/// Responses are taken relative to the paper white when level 255 was
/// measured. Untested ends are anchored at (0, 0) and (1, 1).
pub fn build_tone_curves(
    levels: &[NeutralLevel],
    smoothing: bool,
) -> Result<BTreeMap<Channel, ToneCurve>> {
    if levels.len() < 2 {
        warn!(
            levels = levels.len(),
            "Fewer than two grey levels measured; using sRGB tone curves"
        );
        return Ok(Channel::ALL
            .into_iter()
            .map(|channel| (channel, srgb_tone_curve()))
            .collect());
    }

    let mut responses: [Vec<f64>; 3] = Default::default();
    for level in levels {
        let rgb = lab_to_linear_rgb(Lab::new(level.l, level.a, level.b))?;
        for (channel, value) in responses.iter_mut().zip(rgb) {
            channel.push(value);
        }
    }

    // Paper-relative response
    if let Some(last) = levels.last().filter(|entry| entry.level == u8::MAX) {
        for channel in responses.iter_mut() {
            let white = channel[channel.len() - 1];
            if white > 0.0 {
                channel.iter_mut().for_each(|v| *v /= white);
            }
        }
        debug!(l = last.l, "Normalised tone response to measured paper white");
    }

    let mut curves = BTreeMap::new();
    for channel in Channel::ALL {
        let mut response = responses[channel.index()].clone();
        if smoothing {
            response = smooth3(&response);
        }
        let curve = response_curve(levels, &response);
        ensure_monotonic(channel, levels, &curve)?;
        curves.insert(channel, curve);
    }
    Ok(curves)
}

/// Three-tap moving average, endpoints kept
fn smooth3(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    for i in 1..values.len().saturating_sub(1) {
        out[i] = (values[i - 1] + values[i] + values[i + 1]) / 3.0;
    }
    out
}

fn response_curve(levels: &[NeutralLevel], response: &[f64]) -> ToneCurve {
    let mut points = Vec::with_capacity(levels.len() + 2);
    if levels.first().map(|entry| entry.level) != Some(0) {
        points.push(CurvePoint::new(0.0, 0.0));
    }
    for (entry, value) in levels.iter().zip(response) {
        points.push(CurvePoint::new(
            entry.level as f64 / 255.0,
            value.clamp(0.0, 1.0),
        ));
    }
    if levels.last().map(|entry| entry.level) != Some(u8::MAX) {
        points.push(CurvePoint::new(1.0, 1.0));
    }
    ToneCurve::new(points)
}

fn ensure_monotonic(channel: Channel, levels: &[NeutralLevel], curve: &ToneCurve) -> Result<()> {
    for pair in curve.points.windows(2) {
        if pair[1].output <= pair[0].output {
            let input = pair[1].input;
            let level = levels
                .iter()
                .map(|entry| entry.level)
                .find(|level| (*level as f64 / 255.0 - input).abs() < 1e-9)
                .unwrap_or(if input >= 1.0 { u8::MAX } else { 0 });
            return Err(CalibrationError::NonMonotonicCurve { channel, level });
        }
    }
    Ok(())
}

/// Uniformly resample a curve into `size` entries over [0, 1]
pub fn sample_curve(curve: &ToneCurve, size: usize) -> Vec<f64> {
    if size < 2 {
        return vec![curve.evaluate(0.0); size];
    }
    let last = (size - 1) as f64;
    (0..size)
        .map(|i| curve.evaluate(i as f64 / last).clamp(0.0, 1.0))
        .collect()
}
