//! Device correction profile model, the input to ICC serialization.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::color::{Matrix3, Xyz};

/// Device colour channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (input, output) sample of a tone curve, both normalised to 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub input: f64,
    pub output: f64,
}

impl CurvePoint {
    pub fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Piecewise-linear tone curve, points sorted by input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneCurve {
    pub points: Vec<CurvePoint>,
}

impl ToneCurve {
    pub fn new(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }

    /// Straight line from (0, 0) to (1, 1)
    pub fn identity() -> Self {
        Self::new(vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)])
    }

    /// Evaluate at `x`, interpolating linearly and clamping outside the sampled range
    pub fn evaluate(&self, x: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return x.clamp(0.0, 1.0),
        };
        if x <= first.input {
            return first.output;
        }
        if x >= last.input {
            return last.output;
        }

        for pair in self.points.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            if x <= p1.input {
                let span = p1.input - p0.input;
                if span <= 0.0 {
                    return p1.output;
                }
                let t = (x - p0.input) / span;
                return p0.output + t * (p1.output - p0.output);
            }
        }
        last.output
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.points
            .windows(2)
            .all(|pair| pair[1].input > pair[0].input && pair[1].output > pair[0].output)
    }
}

/// ICC profile/device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Input device ('scnr')
    Input,

    /// Display device ('mntr')
    #[default]
    Display,

    /// Output device ('prtr'); needs lookup-table tags this encoder does not write
    Output,
}

impl DeviceClass {
    pub fn signature(self) -> Signature {
        match self {
            Self::Input => Signature(*b"scnr"),
            Self::Display => Signature(*b"mntr"),
            Self::Output => Signature(*b"prtr"),
        }
    }
}

/// ICC rendering intent, encoded as its header value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderingIntent {
    #[default]
    Perceptual,
    RelativeColorimetric,
    Saturation,
    AbsoluteColorimetric,
}

impl RenderingIntent {
    pub fn code(self) -> u32 {
        match self {
            Self::Perceptual => 0,
            Self::RelativeColorimetric => 1,
            Self::Saturation => 2,
            Self::AbsoluteColorimetric => 3,
        }
    }
}

/// Four-character ICC signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 4]);

impl Signature {
    pub fn as_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl FromStr for Signature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return Err(format!(
                "Signature must be exactly four printable ASCII characters, got '{}'",
                s
            ));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub creation_date: DateTime<Utc>,
    pub description: String,
    pub copyright: String,
}

/// Final device correction profile. Built once from the converged analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorProfile {
    /// Device value -> linearised channel output
    pub tone_curves: BTreeMap<Channel, ToneCurve>,

    /// Correction for residual hue/saturation drift, applied in PCS XYZ
    pub correction_matrix: Matrix3,

    /// Device RGB -> PCS XYZ (D50); columns become rXYZ/gXYZ/bXYZ
    pub colorant_matrix: Matrix3,

    /// Media white point
    pub white_point: Xyz,

    pub device_class: DeviceClass,
    pub rendering_intent: RenderingIntent,
    pub creator: Signature,
    pub metadata: ProfileMetadata,
}

impl ColorProfile {
    pub fn tone_curve(&self, channel: Channel) -> Option<&ToneCurve> {
        self.tone_curves.get(&channel)
    }

    /// Colorant column for `channel` (the rXYZ/gXYZ/bXYZ tag value)
    pub fn colorant(&self, channel: Channel) -> Xyz {
        let i = channel.index();
        Xyz::new(
            self.colorant_matrix[0][i],
            self.colorant_matrix[1][i],
            self.colorant_matrix[2][i],
        )
    }
}
