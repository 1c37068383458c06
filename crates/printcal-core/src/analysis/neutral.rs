//! Neutral-axis diagnostics: bias estimation and slope consistency.

use serde::{Deserialize, Serialize};

use crate::models::{NeutralBias, PatchMeasurement};

/// Equal-weight mean of a*/b* over the neutral patches, optionally restricted
/// to `levels`. Returns the bias and the number of contributing patches.
pub fn neutral_bias(patches: &[PatchMeasurement], levels: Option<&[u8]>) -> (NeutralBias, usize) {
    let mut a_sum = 0.0;
    let mut b_sum = 0.0;
    let mut count = 0usize;

    for patch in patches {
        let Some(level) = patch.nominal.grey_level() else {
            continue;
        };
        if let Some(levels) = levels {
            if !levels.contains(&level) {
                continue;
            }
        }
        a_sum += patch.lab.a;
        b_sum += patch.lab.b;
        count += 1;
    }

    if count == 0 {
        return (NeutralBias::default(), 0);
    }

    let n = count as f64;
    (NeutralBias::new(a_sum / n, b_sum / n), count)
}

/// Mean Lab of one grey level across duplicate patches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeutralLevel {
    pub level: u8,
    pub l: f64,
    pub a: f64,
    pub b: f64,
    pub samples: usize,
}

/// Group neutral patches by grey level (ascending), averaging duplicates
pub fn neutral_levels<'a>(patches: impl IntoIterator<Item = &'a PatchMeasurement>) -> Vec<NeutralLevel> {
    let mut levels: Vec<NeutralLevel> = Vec::new();

    for patch in patches {
        let Some(level) = patch.nominal.grey_level() else {
            continue;
        };
        match levels.iter_mut().find(|entry| entry.level == level) {
            Some(entry) => {
                entry.l += patch.lab.l;
                entry.a += patch.lab.a;
                entry.b += patch.lab.b;
                entry.samples += 1;
            }
            None => levels.push(NeutralLevel {
                level,
                l: patch.lab.l,
                a: patch.lab.a,
                b: patch.lab.b,
                samples: 1,
            }),
        }
    }

    for entry in &mut levels {
        let n = entry.samples as f64;
        entry.l /= n;
        entry.a /= n;
        entry.b /= n;
    }
    levels.sort_by_key(|entry| entry.level);
    levels
}

/// Result of checking whether the cast keeps its direction along the grey ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeReport {
    /// Grey levels examined, ascending
    pub levels: Vec<u8>,
    /// False when a* or b* changes sign between adjacent levels
    pub monotonic: bool,
    /// First adjacent pair (lower, upper) where the sign flips
    pub break_at: Option<(u8, u8)>,
}

/// Check that neither a* nor b* changes sign between adjacent grey levels.
///
/// A sign flip means a single gross ink correction cannot neutralise the whole
/// ramp, which usually points at driver limits rather than ink balance.
pub fn check_neutral_slope(patches: &[PatchMeasurement]) -> SlopeReport {
    let levels = neutral_levels(patches);
    let mut break_at = None;

    for pair in levels.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if lower.a * upper.a < 0.0 || lower.b * upper.b < 0.0 {
            break_at = Some((lower.level, upper.level));
            break;
        }
    }

    SlopeReport {
        levels: levels.iter().map(|entry| entry.level).collect(),
        monotonic: break_at.is_none(),
        break_at,
    }
}
