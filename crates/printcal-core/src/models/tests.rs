//! Tests for model helpers

use super::*;
use crate::color::Lab;

#[test]
fn test_nominal_neutral_detection() {
    assert!(Nominal::Grey(128).is_neutral());
    assert!(Nominal::Rgb([64, 64, 64]).is_neutral());
    assert_eq!(Nominal::Rgb([64, 64, 64]).grey_level(), Some(64));
    assert!(!Nominal::Rgb([255, 0, 0]).is_neutral());
    assert_eq!(Nominal::Grey(10).rgb(), [10, 10, 10]);
}

#[test]
fn test_nominal_deserializes_grey_or_triple() {
    let grey: Nominal = serde_json::from_str("150").unwrap();
    assert_eq!(grey, Nominal::Grey(150));
    let rgb: Nominal = serde_json::from_str("[255, 64, 64]").unwrap();
    assert_eq!(rgb, Nominal::Rgb([255, 64, 64]));
}

#[test]
fn test_patch_measurement_json() {
    let json = r#"{"id": "Skin1", "nominal": [224, 172, 105], "lab": {"L": 72.5, "a": 12.0, "b": 30.1}}"#;
    let patch: PatchMeasurement = serde_json::from_str(json).unwrap();
    assert_eq!(patch.id, PatchId::Name("Skin1".to_string()));
    assert_eq!(patch.lab, Lab::new(72.5, 12.0, 30.1));
    assert!(!patch.is_neutral());

    let indexed: PatchId = serde_json::from_str("7").unwrap();
    assert_eq!(indexed, PatchId::Index(7));
    assert_eq!(indexed.to_string(), "7");
}

#[test]
fn test_tone_curve_evaluate() {
    let curve = ToneCurve::new(vec![
        CurvePoint::new(0.0, 0.0),
        CurvePoint::new(0.5, 0.25),
        CurvePoint::new(1.0, 1.0),
    ]);
    assert_eq!(curve.evaluate(0.0), 0.0);
    assert!((curve.evaluate(0.25) - 0.125).abs() < 1e-12);
    assert!((curve.evaluate(0.75) - 0.625).abs() < 1e-12);
    assert_eq!(curve.evaluate(-1.0), 0.0);
    assert_eq!(curve.evaluate(2.0), 1.0);
    assert!(curve.is_strictly_increasing());

    let flat = ToneCurve::new(vec![CurvePoint::new(0.0, 0.2), CurvePoint::new(1.0, 0.2)]);
    assert!(!flat.is_strictly_increasing());
}

#[test]
fn test_ink_adjustment_magnitude() {
    let adj = InkAdjustment::new(-1.5, 0.5, 3.0);
    assert_eq!(adj.max_abs(), 3.0);
    assert!(!adj.is_zero());
    assert!(InkAdjustment::ZERO.is_zero());
}

#[test]
fn test_signature_parsing() {
    let sig: Signature = "PCAL".parse().unwrap();
    assert_eq!(sig.as_u32(), 0x5043_414C);
    assert!("toolong".parse::<Signature>().is_err());
    assert!("ab".parse::<Signature>().is_err());
    assert_eq!(DeviceClass::Output.signature().to_string(), "prtr");
    assert_eq!(DeviceClass::default(), DeviceClass::Display);
    assert_eq!(RenderingIntent::AbsoluteColorimetric.code(), 3);
}
