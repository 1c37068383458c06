//! Measured patch records, as produced by the CSV loader.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Lab;

/// Patch identifier: chart position or label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchId {
    Index(u32),
    Name(String),
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for PatchId {
    fn from(value: u32) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for PatchId {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

/// Nominal device code printed for a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nominal {
    /// 0-255 grey level (R = G = B)
    Grey(u8),

    /// RGB triple
    Rgb([u8; 3]),
}

impl Nominal {
    /// True for grey levels, including RGB triples with equal components
    pub fn is_neutral(&self) -> bool {
        self.grey_level().is_some()
    }

    pub fn grey_level(&self) -> Option<u8> {
        match *self {
            Self::Grey(level) => Some(level),
            Self::Rgb([r, g, b]) if r == g && g == b => Some(r),
            Self::Rgb(_) => None,
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match *self {
            Self::Grey(level) => [level; 3],
            Self::Rgb(rgb) => rgb,
        }
    }
}

/// One spectrophotometer reading of a printed patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchMeasurement {
    pub id: PatchId,
    pub nominal: Nominal,
    pub lab: Lab,
}

impl PatchMeasurement {
    pub fn new(id: impl Into<PatchId>, nominal: Nominal, lab: Lab) -> Self {
        Self {
            id: id.into(),
            nominal,
            lab,
        }
    }

    /// Convenience constructor for a neutral patch
    pub fn grey(id: impl Into<PatchId>, level: u8, l: f64, a: f64, b: f64) -> Self {
        Self::new(id, Nominal::Grey(level), Lab::new(l, a, b))
    }

    /// Convenience constructor for a colour patch
    pub fn colour(id: impl Into<PatchId>, rgb: [u8; 3], l: f64, a: f64, b: f64) -> Self {
        Self::new(id, Nominal::Rgb(rgb), Lab::new(l, a, b))
    }

    pub fn is_neutral(&self) -> bool {
        self.nominal.is_neutral()
    }
}
