//! Perceptual colour difference metrics

use serde::{Deserialize, Serialize};

use super::lab::Lab;

/// 25^7, shared by the CIEDE2000 G and R_C terms
const POW25_7: f64 = 6_103_515_625.0;

/// Selectable delta-E formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeltaEFormula {
    /// Euclidean distance in Lab
    Cie76,

    /// CIE94 with graphic-arts weights
    Cie94,

    /// Full CIEDE2000
    #[default]
    Ciede2000,
}

impl DeltaEFormula {
    pub fn compute(self, lab1: Lab, lab2: Lab) -> f64 {
        match self {
            Self::Cie76 => delta_e76(lab1, lab2),
            Self::Cie94 => delta_e94(lab1, lab2),
            Self::Ciede2000 => delta_e2000(lab1, lab2),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Cie76 => "CIE76",
            Self::Cie94 => "CIE94",
            Self::Ciede2000 => "CIEDE2000",
        }
    }
}

/// CIE76: straight Euclidean distance
pub fn delta_e76(lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// CIE94 (graphic arts: kL=1, K1=0.045, K2=0.015), `lab1` is the reference
pub fn delta_e94(lab1: Lab, lab2: Lab) -> f64 {
    const K1: f64 = 0.045;
    const K2: f64 = 0.015;

    let dl = lab1.l - lab2.l;
    let c1 = lab1.chroma();
    let c2 = lab2.chroma();
    let dc = c1 - c2;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    // ΔH² can go slightly negative through rounding
    let dh_sq = (da * da + db * db - dc * dc).max(0.0);

    let sc = 1.0 + K1 * c1;
    let sh = 1.0 + K2 * c1;

    let term_c = dc / sc;
    (dl * dl + term_c * term_c + dh_sq / (sh * sh)).sqrt()
}

/// CIEDE2000 per CIE Technical Report 142-2001, with kL = kC = kH = 1
pub fn delta_e2000(lab1: Lab, lab2: Lab) -> f64 {
    let c_ab_mean = (lab1.chroma() + lab2.chroma()) / 2.0;
    let c_mean_pow7 = c_ab_mean.powi(7);
    let g = 0.5 * (1.0 - (c_mean_pow7 / (c_mean_pow7 + POW25_7)).sqrt());

    let a1_prime = lab1.a * (1.0 + g);
    let a2_prime = lab2.a * (1.0 + g);
    let c1_prime = a1_prime.hypot(lab1.b);
    let c2_prime = a2_prime.hypot(lab2.b);
    let h1_prime = hue_angle(a1_prime, lab1.b);
    let h2_prime = hue_angle(a2_prime, lab2.b);

    let delta_l_prime = lab2.l - lab1.l;
    let delta_c_prime = c2_prime - c1_prime;

    let chroma_product = c1_prime * c2_prime;
    let delta_h_prime = if chroma_product == 0.0 {
        0.0
    } else {
        let dh = h2_prime - h1_prime;
        if dh.abs() <= 180.0 {
            dh
        } else if dh > 180.0 {
            dh - 360.0
        } else {
            dh + 360.0
        }
    };
    let delta_big_h_prime = 2.0 * chroma_product.sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    let l_prime_mean = (lab1.l + lab2.l) / 2.0;
    let c_prime_mean = (c1_prime + c2_prime) / 2.0;
    let h_prime_mean = if chroma_product == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= 180.0 {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < 360.0 {
        (h1_prime + h2_prime + 360.0) / 2.0
    } else {
        (h1_prime + h2_prime - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_prime_mean - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_prime_mean).to_radians().cos()
        + 0.32 * (3.0 * h_prime_mean + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_prime_mean - 63.0).to_radians().cos();

    let l_offset_sq = (l_prime_mean - 50.0).powi(2);
    let sl = 1.0 + (0.015 * l_offset_sq) / (20.0 + l_offset_sq).sqrt();
    let sc = 1.0 + 0.045 * c_prime_mean;
    let sh = 1.0 + 0.015 * c_prime_mean * t;

    // Rotation term, active in the blue region around 275°
    let delta_theta = 30.0 * (-((h_prime_mean - 275.0) / 25.0).powi(2)).exp();
    let c_prime_mean_pow7 = c_prime_mean.powi(7);
    let rc = 2.0 * (c_prime_mean_pow7 / (c_prime_mean_pow7 + POW25_7)).sqrt();
    let rt = -(2.0 * delta_theta).to_radians().sin() * rc;

    let term_l = delta_l_prime / sl;
    let term_c = delta_c_prime / sc;
    let term_h = delta_big_h_prime / sh;

    (term_l * term_l + term_c * term_c + term_h * term_h + rt * term_c * term_h).sqrt()
}

/// Hue angle in degrees (0-360)
fn hue_angle(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}
