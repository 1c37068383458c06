//! Colour math
//!
//! Lab <-> XYZ/RGB conversions and delta-E metrics. Pure functions; the only
//! failure mode is domain validation.

mod delta_e;
mod lab;
pub mod matrix;

#[cfg(test)]
mod tests;

pub use delta_e::{delta_e2000, delta_e76, delta_e94, DeltaEFormula};
pub use lab::{
    grey_level_lightness, lab_to_linear_rgb, lab_to_xyz, linear_to_srgb, srgb8_to_lab,
    srgb_to_linear, xyz_to_lab, Lab, Xyz, D50, D65, SRGB_TO_XYZ_D50, XYZ_D50_TO_SRGB,
};
pub use matrix::Matrix3;
