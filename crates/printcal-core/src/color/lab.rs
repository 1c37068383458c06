//! CIE L*a*b* and XYZ conversions

use serde::{Deserialize, Serialize};

use super::matrix::{mul_vector, Matrix3};
use crate::error::{CalibrationError, Result};

/// LAB color representation (CIE L*a*b*)
/// - L: 0.0-100.0 (lightness)
/// - a: approximately -128 to +128 (green-red axis)
/// - b: approximately -128 to +128 (blue-yellow axis)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    #[serde(rename = "L")]
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Chroma C*ab
    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Fails with a domain error when L* is outside [0, 100] or any component is non-finite
    pub fn validate(&self) -> Result<()> {
        if !(self.l.is_finite() && self.a.is_finite() && self.b.is_finite()) {
            return Err(CalibrationError::Domain(format!(
                "Lab value ({}, {}, {}) is not finite",
                self.l, self.a, self.b
            )));
        }
        if !(0.0..=100.0).contains(&self.l) {
            return Err(CalibrationError::Domain(format!(
                "L* = {} is outside [0, 100]",
                self.l
            )));
        }
        Ok(())
    }
}

/// CIE XYZ tristimulus values, Y normalised to 1.0 for the reference white
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// D50 illuminant, the ICC profile connection space white and the default
/// measurement white for spectrophotometer readings
pub const D50: Xyz = Xyz::new(0.96422, 1.0, 0.82521);

/// D65 standard illuminant reference white point
pub const D65: Xyz = Xyz::new(0.95047, 1.0, 1.08883);

/// Linear sRGB to XYZ, Bradford-adapted to D50
pub const SRGB_TO_XYZ_D50: Matrix3 = [
    [0.4360747, 0.3850649, 0.1430804],
    [0.2225045, 0.7168786, 0.0606169],
    [0.0139322, 0.0971045, 0.7141733],
];

/// XYZ (D50) to linear sRGB
pub const XYZ_D50_TO_SRGB: Matrix3 = [
    [3.1338561, -1.6168667, -0.4906146],
    [-0.9787684, 1.9161415, 0.0334540],
    [0.0719453, -0.2289914, 1.4052427],
];

/// LAB f(t) function
#[inline]
fn lab_f(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    const DELTA_CUBED: f64 = DELTA * DELTA * DELTA; // ~0.008856

    if t > DELTA_CUBED {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// LAB f^-1(t) inverse function
#[inline]
fn lab_f_inv(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;

    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

fn validate_white_point(white: Xyz) -> Result<()> {
    let components = white.to_array();
    if components.iter().any(|c| !c.is_finite() || *c <= 0.0) {
        return Err(CalibrationError::Domain(format!(
            "White point ({}, {}, {}) must have positive components",
            white.x, white.y, white.z
        )));
    }
    Ok(())
}

/// Convert CIE LAB to XYZ relative to `white`
pub fn lab_to_xyz(lab: Lab, white: Xyz) -> Result<Xyz> {
    lab.validate()?;
    validate_white_point(white)?;

    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    Ok(Xyz {
        x: white.x * lab_f_inv(fx),
        y: white.y * lab_f_inv(fy),
        z: white.z * lab_f_inv(fz),
    })
}

/// Convert XYZ to CIE LAB relative to `white`
///
/// Fails when the resulting lightness falls outside [0, 100], i.e. when Y is
/// negative or brighter than the reference white.
pub fn xyz_to_lab(xyz: Xyz, white: Xyz) -> Result<Lab> {
    validate_white_point(white)?;
    if !(xyz.x.is_finite() && xyz.y.is_finite() && xyz.z.is_finite()) {
        return Err(CalibrationError::Domain(format!(
            "XYZ value ({}, {}, {}) is not finite",
            xyz.x, xyz.y, xyz.z
        )));
    }

    // Normalize by reference white
    let fx = lab_f(xyz.x / white.x);
    let fy = lab_f(xyz.y / white.y);
    let fz = lab_f(xyz.z / white.z);

    let l = 116.0 * fy - 16.0;
    const L_SLACK: f64 = 1e-9;
    if !(-L_SLACK..=100.0 + L_SLACK).contains(&l) {
        return Err(CalibrationError::Domain(format!(
            "XYZ Y = {} maps to L* = {} outside [0, 100]",
            xyz.y, l
        )));
    }

    Ok(Lab {
        l: l.clamp(0.0, 100.0),
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    })
}

/// sRGB transfer function, encoded -> linear
#[inline]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB transfer function, linear -> encoded
#[inline]
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert an 8-bit sRGB triple to LAB (D50)
pub fn srgb8_to_lab(rgb: [u8; 3]) -> Lab {
    let linear = rgb.map(|c| srgb_to_linear(c as f64 / 255.0));
    let xyz = mul_vector(&SRGB_TO_XYZ_D50, linear);
    // The adapted matrix maps sRGB white onto D50, so Y never exceeds 1.0 here.
    let fx = lab_f(xyz[0] / D50.x);
    let fy = lab_f(xyz[1] / D50.y);
    let fz = lab_f(xyz[2] / D50.z);
    Lab {
        l: (116.0 * fy - 16.0).clamp(0.0, 100.0),
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// L* of an sRGB grey level; the achromatic target of neutral patches
pub fn grey_level_lightness(level: u8) -> f64 {
    let y = srgb_to_linear(level as f64 / 255.0);
    (116.0 * lab_f(y) - 16.0).clamp(0.0, 100.0)
}

/// Convert a D50 LAB measurement to linear sRGB.
///
/// Output may fall outside 0.0-1.0 for out-of-gamut colours.
pub fn lab_to_linear_rgb(lab: Lab) -> Result<[f64; 3]> {
    let xyz = lab_to_xyz(lab, D50)?;
    Ok(mul_vector(&XYZ_D50_TO_SRGB, xyz.to_array()))
}
