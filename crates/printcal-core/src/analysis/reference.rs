//! Reference chart and expected colours for nominal codes.

use crate::color::{grey_level_lightness, srgb8_to_lab, Lab};
use crate::models::Nominal;

/// A named patch of the printed test chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePatch {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

impl ReferencePatch {
    const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self { name, rgb: [r, g, b] }
    }

    pub fn nominal(&self) -> Nominal {
        Nominal::Rgb(self.rgb)
    }

    pub fn reference_lab(&self) -> Lab {
        reference_lab(self.nominal())
    }
}

/// The 24-patch calibration chart
pub const REFERENCE_CHART: [ReferencePatch; 24] = [
    // Neutrals
    ReferencePatch::new("N0", 0, 0, 0),
    ReferencePatch::new("N64", 64, 64, 64),
    ReferencePatch::new("N128", 128, 128, 128),
    ReferencePatch::new("N192", 192, 192, 192),
    ReferencePatch::new("N224", 224, 224, 224),
    ReferencePatch::new("N240", 240, 240, 240),
    ReferencePatch::new("N248", 248, 248, 248),
    ReferencePatch::new("N255", 255, 255, 255),
    // Primaries
    ReferencePatch::new("R", 255, 0, 0),
    ReferencePatch::new("G", 0, 255, 0),
    ReferencePatch::new("B", 0, 0, 255),
    // Secondaries
    ReferencePatch::new("C", 0, 255, 255),
    ReferencePatch::new("M", 255, 0, 255),
    ReferencePatch::new("Y", 255, 255, 0),
    // Light tints
    ReferencePatch::new("R+64", 255, 64, 64),
    ReferencePatch::new("G+64", 64, 255, 64),
    ReferencePatch::new("B+64", 64, 64, 255),
    // Dark tones
    ReferencePatch::new("R-64", 192, 0, 0),
    ReferencePatch::new("G-64", 0, 192, 0),
    ReferencePatch::new("B-64", 0, 0, 192),
    // Memory colours
    ReferencePatch::new("Skin1", 224, 172, 105),
    ReferencePatch::new("Skin2", 198, 134, 66),
    ReferencePatch::new("Sky", 135, 206, 235),
    ReferencePatch::new("Leaf", 34, 139, 34),
];

/// Look up a chart patch by name (case-insensitive)
pub fn reference_patch(name: &str) -> Option<&'static ReferencePatch> {
    REFERENCE_CHART
        .iter()
        .find(|patch| patch.name.eq_ignore_ascii_case(name.trim()))
}

/// Expected Lab (D50) for a nominal code.
///
/// Grey levels map to an exactly achromatic target so that any measured a*/b*
/// is attributed to the printer.
pub fn reference_lab(nominal: Nominal) -> Lab {
    match nominal.grey_level() {
        Some(level) => Lab::new(grey_level_lightness(level), 0.0, 0.0),
        None => srgb8_to_lab(nominal.rgb()),
    }
}
