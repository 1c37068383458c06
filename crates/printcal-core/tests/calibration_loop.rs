//! End-to-end calibration loop against a simulated printer.

use chrono::{Duration, TimeZone, Utc};
use printcal_core::analysis::{predicted_shift, REFERENCE_CHART};
use printcal_core::color::{grey_level_lightness, srgb8_to_lab};
use printcal_core::config::AnalyzerConfig;
use printcal_core::profile::write_profile;
use printcal_core::{
    load_calibration_config, CalibrationSession, ConvergenceStatus, InkAdjustment, Lab,
    PatchMeasurement,
};
use tracing_subscriber::EnvFilter;

const GREY_LEVELS: [u8; 8] = [0, 64, 128, 192, 224, 240, 248, 255];

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Printer whose grey cast responds to ink changes at half the modelled rate
struct SimulatedPrinter {
    cast: [f64; 2],
    model: AnalyzerConfig,
}

impl SimulatedPrinter {
    fn print_chart(&self) -> Vec<PatchMeasurement> {
        let mut patches: Vec<PatchMeasurement> = GREY_LEVELS
            .iter()
            .enumerate()
            .map(|(i, &level)| {
                PatchMeasurement::grey(
                    i as u32,
                    level,
                    grey_level_lightness(level) * 0.97,
                    self.cast[0],
                    self.cast[1],
                )
            })
            .collect();

        for patch in REFERENCE_CHART.iter().filter(|p| !p.nominal().is_neutral()) {
            let lab = srgb8_to_lab(patch.rgb);
            patches.push(PatchMeasurement::new(
                patch.name,
                patch.nominal(),
                Lab::new(lab.l * 0.97, lab.a * 0.96 + self.cast[0], lab.b * 0.96 + self.cast[1]),
            ));
        }
        patches
    }

    fn apply(&mut self, adjustment: InkAdjustment) {
        let [da, db] = predicted_shift(adjustment, &self.model);
        self.cast[0] += 0.5 * da;
        self.cast[1] += 0.5 * db;
    }
}

#[test]
fn test_calibration_loop_converges_and_writes_profile() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("printcal.yml");
    std::fs::write(
        &config_path,
        "convergence:\n  window: 3\n  metric_threshold: 6.0\nprofile:\n  description: Studio printer\n  curve_table_size: 1024\n",
    )
    .unwrap();

    let handle = load_calibration_config(Some(&config_path));
    assert!(handle.source.is_some());
    assert_eq!(handle.config.profile.curve_table_size, 1024);

    let mut session = CalibrationSession::new(&handle.config);
    let mut printer = SimulatedPrinter {
        cast: [3.0, -2.5],
        model: handle.config.analyzer.clone(),
    };
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();

    let mut status = ConvergenceStatus::Continue;
    for iteration in 0..12 {
        let measured_at = start + Duration::hours(iteration);
        let outcome = session
            .submit(&printer.print_chart(), Some(measured_at))
            .unwrap();
        status = outcome.status;
        if status.is_terminal() {
            assert!(outcome.within_tolerance);
            break;
        }
        printer.apply(outcome.suggested_adjustment);
    }
    assert_eq!(status, ConvergenceStatus::Converged);

    let trend = session.tracker().state().trend();
    assert!(trend.len() >= 3);
    let first = trend.overall_metric[0];
    let last = trend.overall_metric[trend.len() - 1];
    assert!(last < first, "metric went from {} to {}", first, last);

    let exported = session.export_profile().unwrap();
    assert_eq!(exported.profile.metadata.description, "Studio printer");
    let profile_path = dir.path().join("out").join("studio.icc");
    write_profile(&exported.icc, &profile_path).unwrap();
    let written = std::fs::read(&profile_path).unwrap();
    assert_eq!(written, exported.icc);
    assert_eq!(&written[36..40], b"acsp");
}

#[test]
fn test_runaway_printer_diverges() {
    init_logging();
    let mut session = CalibrationSession::new(&Default::default());
    let mut printer = SimulatedPrinter {
        cast: [1.0, 1.0],
        model: AnalyzerConfig::default(),
    };

    let mut status = ConvergenceStatus::Continue;
    for _ in 0..6 {
        status = session.submit(&printer.print_chart(), None).unwrap().status;
        if status.is_terminal() {
            break;
        }
        // Drifts further each print regardless of the suggested correction
        printer.cast[0] *= 2.0;
        printer.cast[1] *= 2.0;
    }
    assert_eq!(status, ConvergenceStatus::Diverged);
    assert!(matches!(
        session.export_profile().unwrap_err(),
        printcal_core::CalibrationError::NotConverged(ConvergenceStatus::Diverged)
    ));
}
