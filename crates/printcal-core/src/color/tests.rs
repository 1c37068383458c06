//! Tests for colour conversions and delta-E metrics

use super::*;
use crate::error::CalibrationError;

#[test]
fn test_lab_xyz_roundtrip() {
    let test_cases = [
        Lab::new(0.0, 0.0, 0.0),
        Lab::new(100.0, 0.0, 0.0),
        Lab::new(53.2, -0.5, 1.2),
        Lab::new(67.1, 0.1, -0.9),
        Lab::new(50.0, 60.0, -40.0),
        Lab::new(8.0, -20.0, 30.0),
        Lab::new(91.0, -5.0, 80.0),
    ];

    for white in [D50, D65] {
        for lab in test_cases {
            let xyz = lab_to_xyz(lab, white).unwrap();
            let back = xyz_to_lab(xyz, white).unwrap();
            assert!((lab.l - back.l).abs() < 1e-9, "L mismatch for {:?}: {:?}", lab, back);
            assert!((lab.a - back.a).abs() < 1e-9, "a mismatch for {:?}: {:?}", lab, back);
            assert!((lab.b - back.b).abs() < 1e-9, "b mismatch for {:?}: {:?}", lab, back);
        }
    }
}

#[test]
fn test_white_maps_to_reference_white() {
    let xyz = lab_to_xyz(Lab::new(100.0, 0.0, 0.0), D50).unwrap();
    assert!((xyz.x - D50.x).abs() < 1e-12);
    assert!((xyz.y - D50.y).abs() < 1e-12);
    assert!((xyz.z - D50.z).abs() < 1e-12);
}

#[test]
fn test_lab_to_xyz_rejects_out_of_range_lightness() {
    for l in [-0.1, 100.5, f64::NAN] {
        let err = lab_to_xyz(Lab::new(l, 0.0, 0.0), D50).unwrap_err();
        assert!(matches!(err, CalibrationError::Domain(_)), "L = {} should fail", l);
    }
}

#[test]
fn test_non_positive_white_point_rejected() {
    let bad_whites = [
        Xyz::new(0.0, 1.0, 1.0),
        Xyz::new(0.9, -1.0, 0.8),
        Xyz::new(0.9, 1.0, f64::INFINITY),
    ];
    for white in bad_whites {
        assert!(matches!(
            lab_to_xyz(Lab::new(50.0, 0.0, 0.0), white),
            Err(CalibrationError::Domain(_))
        ));
        assert!(matches!(
            xyz_to_lab(Xyz::new(0.2, 0.2, 0.2), white),
            Err(CalibrationError::Domain(_))
        ));
    }
}

#[test]
fn test_xyz_brighter_than_white_rejected() {
    let err = xyz_to_lab(Xyz::new(1.0, 1.2, 0.9), D50).unwrap_err();
    assert!(matches!(err, CalibrationError::Domain(_)));
}

#[test]
fn test_srgb_neutrals_are_achromatic() {
    for level in [0u8, 64, 128, 192, 255] {
        let lab = srgb8_to_lab([level, level, level]);
        assert!(lab.a.abs() < 0.01, "a* for grey {} was {}", level, lab.a);
        assert!(lab.b.abs() < 0.01, "b* for grey {} was {}", level, lab.b);
        assert!((lab.l - grey_level_lightness(level)).abs() < 0.01);
    }
    assert!((grey_level_lightness(255) - 100.0).abs() < 1e-9);
    assert!(grey_level_lightness(0).abs() < 1e-9);
}

#[test]
fn test_srgb_primaries_hue() {
    // D50 red is roughly L=54, a=81, b=70
    let red = srgb8_to_lab([255, 0, 0]);
    assert!((red.l - 54.3).abs() < 1.0, "red L = {}", red.l);
    assert!(red.a > 70.0 && red.b > 60.0, "red = {:?}", red);

    let blue = srgb8_to_lab([0, 0, 255]);
    assert!(blue.b < -90.0, "blue = {:?}", blue);
}

#[test]
fn test_lab_to_linear_rgb_roundtrip() {
    let lab = srgb8_to_lab([135, 206, 235]);
    let rgb = lab_to_linear_rgb(lab).unwrap();
    let expected = [135u8, 206, 235].map(|c| srgb_to_linear(c as f64 / 255.0));
    for (got, want) in rgb.iter().zip(expected) {
        assert!((got - want).abs() < 1e-4, "{} vs {}", got, want);
    }
}

#[test]
fn test_srgb_transfer_roundtrip() {
    for i in 0..=20 {
        let v = i as f64 / 20.0;
        assert!((linear_to_srgb(srgb_to_linear(v)) - v).abs() < 1e-12);
    }
}

#[test]
fn test_delta_e76_identity_and_symmetry() {
    let samples = [
        Lab::new(50.0, 0.0, 0.0),
        Lab::new(53.2, -0.5, 1.2),
        Lab::new(30.0, 40.0, -20.0),
        Lab::new(95.0, -3.0, 7.0),
    ];
    for x in samples {
        assert_eq!(delta_e76(x, x), 0.0);
        for y in samples {
            assert_eq!(delta_e76(x, y), delta_e76(y, x));
        }
    }
    let d = delta_e76(Lab::new(50.0, 3.0, 4.0), Lab::new(50.0, 0.0, 0.0));
    assert!((d - 5.0).abs() < 1e-12);
}

#[test]
fn test_delta_e2000_reference_pairs() {
    // Sharma, Wu & Dalal (2005) test data
    let pairs = [
        ((50.0, 2.6772, -79.7751), (50.0, 0.0, -82.7485), 2.0425),
        ((50.0, 3.1571, -77.2803), (50.0, 0.0, -82.7485), 2.8615),
        ((50.0, -1.3802, -84.2814), (50.0, 0.0, -82.7485), 1.0000),
        ((50.0, 0.0, 0.0), (50.0, -1.0, 2.0), 2.3669),
        ((50.0, 2.49, -0.001), (50.0, -2.49, 0.0009), 7.1792),
        ((50.0, 2.49, -0.001), (50.0, -2.49, 0.0011), 7.2195),
        ((50.0, -0.001, 2.49), (50.0, 0.0011, -2.49), 4.7461),
        ((50.0, 2.5, 0.0), (50.0, 0.0, -2.5), 4.3065),
        ((50.0, 2.5, 0.0), (73.0, 25.0, -18.0), 27.1492),
        ((50.0, 2.5, 0.0), (61.0, -5.0, 29.0), 22.8977),
        ((60.2574, -34.0099, 36.2677), (60.4626, -34.1751, 39.4387), 1.2644),
        ((22.7233, 20.0904, -46.694), (23.0331, 14.973, -42.5619), 2.0373),
        ((90.8027, -2.0831, 1.441), (91.1528, -1.6435, 0.0447), 1.4441),
        ((2.0776, 0.0795, -1.135), (0.9033, -0.0636, -0.5514), 0.9082),
    ];

    for ((l1, a1, b1), (l2, a2, b2), expected) in pairs {
        let x = Lab::new(l1, a1, b1);
        let y = Lab::new(l2, a2, b2);
        let d = delta_e2000(x, y);
        assert!(
            (d - expected).abs() < 1e-4,
            "ΔE00({:?}, {:?}) = {}, expected {}",
            x,
            y,
            d,
            expected
        );
        assert!((d - delta_e2000(y, x)).abs() < 1e-9);
    }
}

#[test]
fn test_delta_e94_neutral_pair_matches_lightness_difference() {
    let d = delta_e94(Lab::new(50.0, 0.0, 0.0), Lab::new(55.0, 0.0, 0.0));
    assert!((d - 5.0).abs() < 1e-12);
}

#[test]
fn test_formula_dispatch() {
    let x = Lab::new(50.0, 10.0, 10.0);
    let y = Lab::new(52.0, 12.0, 7.0);
    assert_eq!(DeltaEFormula::Cie76.compute(x, y), delta_e76(x, y));
    assert_eq!(DeltaEFormula::Cie94.compute(x, y), delta_e94(x, y));
    assert_eq!(DeltaEFormula::Ciede2000.compute(x, y), delta_e2000(x, y));
    assert_eq!(DeltaEFormula::default(), DeltaEFormula::Ciede2000);
}

#[test]
fn test_matrix_inverse() {
    let inv = matrix::inverse(&SRGB_TO_XYZ_D50).unwrap();
    let product = matrix::mul(&inv, &SRGB_TO_XYZ_D50);
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((product[i][j] - expected).abs() < 1e-9);
        }
    }
    assert!(matrix::inverse(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]).is_none());
}
