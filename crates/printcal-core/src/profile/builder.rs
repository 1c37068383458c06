//! Profile synthesis from a converged analysis record.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::curves::build_tone_curves;
use super::icc;
use crate::analysis::{neutral_levels, reference_lab};
use crate::color::matrix::{self, blend_with_identity, inverse, IDENTITY};
use crate::color::{lab_to_xyz, Lab, Matrix3, Xyz, D50, SRGB_TO_XYZ_D50};
use crate::config::ProfileConfig;
use crate::convergence::ConvergenceStatus;
use crate::error::{CalibrationError, Result};
use crate::models::{AnalysisRecord, ColorProfile, PatchMeasurement, ProfileMetadata};

/// Minimum colour patches for a least-squares drift fit
const MIN_DRIFT_PATCHES: usize = 3;

/// Builds and serializes device correction profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    config: ProfileConfig,
}

impl ProfileBuilder {
    pub fn new(mut config: ProfileConfig) -> Self {
        config.sanitize();
        Self { config }
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Build a profile stamped with the current time.
    ///
    /// Only a `CONVERGED` status is accepted.
    pub fn build(&self, record: &AnalysisRecord, status: ConvergenceStatus) -> Result<ColorProfile> {
        self.build_at(record, status, Utc::now())
    }

    pub fn build_at(
        &self,
        record: &AnalysisRecord,
        status: ConvergenceStatus,
        creation_date: DateTime<Utc>,
    ) -> Result<ColorProfile> {
        if status != ConvergenceStatus::Converged {
            return Err(CalibrationError::NotConverged(status));
        }

        let levels = neutral_levels(record.neutral_patches());
        let white_point = match levels.iter().find(|entry| entry.level == u8::MAX) {
            Some(white) => lab_to_xyz(Lab::new(white.l, white.a, white.b), D50)?,
            None => D50,
        };

        let tone_curves = build_tone_curves(&levels, self.config.curve_smoothing)?;

        let colour: Vec<&PatchMeasurement> = record.colour_patches().collect();
        let drift = match fit_drift_matrix(&colour)? {
            Some(fitted) => blend_with_identity(&fitted, self.config.matrix_strength),
            None => {
                if !colour.is_empty() {
                    warn!(
                        patches = colour.len(),
                        "Colour patches do not constrain a drift matrix; using identity"
                    );
                }
                IDENTITY
            }
        };
        let correction_matrix = match inverse(&drift) {
            Some(correction) => correction,
            None => {
                warn!("Blended drift matrix is singular; using identity correction");
                IDENTITY
            }
        };
        let colorant_matrix = matrix::mul(&drift, &SRGB_TO_XYZ_D50);

        info!(
            neutral_levels = levels.len(),
            colour_patches = colour.len(),
            metric = record.overall_metric,
            "Built calibration profile"
        );

        Ok(ColorProfile {
            tone_curves,
            correction_matrix,
            colorant_matrix,
            white_point,
            device_class: self.config.device_class,
            rendering_intent: self.config.rendering_intent,
            creator: self.config.creator,
            metadata: ProfileMetadata {
                creation_date,
                description: self.config.description.clone(),
                copyright: self.config.copyright.clone(),
            },
        })
    }

    /// Encode `profile` as an ICC v2.4 matrix/TRC profile
    pub fn serialize(&self, profile: &ColorProfile) -> Result<Vec<u8>> {
        icc::encode_profile(profile, self.config.curve_table_size)
    }
}

/// Least-squares fit of `A` in `measured ≈ A · reference` over the colour
/// patches, in D50 XYZ, with rows rescaled so `A · D50 = D50`.
///
/// Returns `None` when there are too few patches or the system is degenerate.
pub fn fit_drift_matrix(patches: &[&PatchMeasurement]) -> Result<Option<Matrix3>> {
    if patches.len() < MIN_DRIFT_PATCHES {
        return Ok(None);
    }

    // A = (Σ m rᵀ)(Σ r rᵀ)⁻¹
    let mut cross = [[0.0; 3]; 3];
    let mut gram = [[0.0; 3]; 3];
    for patch in patches {
        let reference = lab_to_xyz(reference_lab(patch.nominal), D50)?.to_array();
        let measured = lab_to_xyz(patch.lab, D50)
            .map_err(|err| CalibrationError::Domain(format!("patch {}: {}", patch.id, err)))?
            .to_array();
        for i in 0..3 {
            for j in 0..3 {
                cross[i][j] += measured[i] * reference[j];
                gram[i][j] += reference[i] * reference[j];
            }
        }
    }

    let Some(gram_inv) = inverse(&gram) else {
        return Ok(None);
    };
    let mut fitted = matrix::mul(&cross, &gram_inv);

    let white = Xyz::from_array(matrix::mul_vector(&fitted, D50.to_array()));
    let targets = D50.to_array();
    for (row, (mapped, target)) in fitted
        .iter_mut()
        .zip(white.to_array().into_iter().zip(targets))
    {
        if !mapped.is_finite() || mapped <= 0.0 {
            return Ok(None);
        }
        let scale = target / mapped;
        row.iter_mut().for_each(|v| *v *= scale);
    }

    if inverse(&fitted).is_none() {
        return Ok(None);
    }
    debug!(?fitted, "Fitted colour drift matrix");
    Ok(Some(fitted))
}
