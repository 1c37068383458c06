//! Tests for the convergence state machine

use super::*;
use crate::config::ConvergenceConfig;
use crate::error::CalibrationError;
use crate::models::{AnalysisRecord, InkAdjustment, NeutralBias};
use chrono::{Duration, TimeZone, Utc};

fn record(metric: f64, adjustment: f64) -> AnalysisRecord {
    AnalysisRecord {
        patches: Vec::new(),
        per_patch_delta_e: Vec::new(),
        neutral_bias: NeutralBias::new(-adjustment, 0.0),
        neutral_count: 0,
        suggested_adjustment: InkAdjustment::new(adjustment, -adjustment, 0.0),
        prior_adjustment: None,
        overall_metric: metric,
        measured_at: None,
    }
}

fn tracker() -> ConvergenceTracker {
    ConvergenceTracker::new(ConvergenceConfig::default())
}

#[test]
fn test_initial_state() {
    let tracker = tracker();
    assert_eq!(tracker.status(), ConvergenceStatus::Continue);
    assert_eq!(tracker.state().iteration_count(), 0);
    assert!(tracker.state().latest().is_none());
}

#[test]
fn test_converges_after_k_stable_records() {
    let mut tracker = tracker();
    assert_eq!(tracker.append(record(2.0, 0.5)).unwrap(), ConvergenceStatus::Continue);
    assert_eq!(tracker.append(record(1.8, 0.3)).unwrap(), ConvergenceStatus::Continue);
    assert_eq!(tracker.append(record(1.9, 0.2)).unwrap(), ConvergenceStatus::Converged);
    assert_eq!(tracker.state().decided_at(), Some(3));
}

#[test]
fn test_single_good_reading_is_not_enough() {
    let mut tracker = tracker();
    tracker.append(record(9.0, 3.0)).unwrap();
    tracker.append(record(6.0, 2.0)).unwrap();
    // Good metric but the window still holds large adjustments
    assert_eq!(tracker.append(record(1.0, 0.1)).unwrap(), ConvergenceStatus::Continue);
    assert_eq!(tracker.append(record(1.0, 0.1)).unwrap(), ConvergenceStatus::Continue);
    assert_eq!(tracker.append(record(1.0, 0.1)).unwrap(), ConvergenceStatus::Converged);
}

#[test]
fn test_large_adjustment_blocks_convergence() {
    let mut tracker = tracker();
    for _ in 0..5 {
        assert_eq!(tracker.append(record(1.0, 1.5)).unwrap(), ConvergenceStatus::Continue);
    }
}

#[test]
fn test_diverges_on_k_strictly_increasing_metrics() {
    let mut tracker = tracker();
    assert_eq!(tracker.append(record(5.0, 2.0)).unwrap(), ConvergenceStatus::Continue);
    assert_eq!(tracker.append(record(6.0, 2.0)).unwrap(), ConvergenceStatus::Continue);
    assert_eq!(tracker.append(record(7.0, 2.0)).unwrap(), ConvergenceStatus::Diverged);
}

#[test]
fn test_plateau_is_not_divergence() {
    let mut tracker = tracker();
    for metric in [5.0, 6.0, 6.0, 7.0] {
        assert_eq!(tracker.append(record(metric, 2.0)).unwrap(), ConvergenceStatus::Continue);
    }
    assert_eq!(tracker.append(record(8.0, 2.0)).unwrap(), ConvergenceStatus::Diverged);
}

#[test]
fn test_terminal_status_is_sticky() {
    let mut tracker = tracker();
    for metric in [5.0, 6.0, 7.0] {
        tracker.append(record(metric, 2.0)).unwrap();
    }
    assert_eq!(tracker.status(), ConvergenceStatus::Diverged);

    // Three perfect readings would converge a fresh tracker
    for _ in 0..3 {
        assert_eq!(tracker.append(record(0.5, 0.0)).unwrap(), ConvergenceStatus::Diverged);
    }
    assert_eq!(tracker.state().iteration_count(), 6);
    assert_eq!(tracker.state().decided_at(), Some(3));

    tracker.reset();
    assert_eq!(tracker.status(), ConvergenceStatus::Continue);
    assert!(tracker.history().is_empty());
    for _ in 0..3 {
        tracker.append(record(0.5, 0.0)).unwrap();
    }
    assert_eq!(tracker.status(), ConvergenceStatus::Converged);
}

#[test]
fn test_non_finite_metric_rejected() {
    let mut tracker = tracker();
    for metric in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = tracker.append(record(metric, 0.0)).unwrap_err();
        assert!(matches!(err, CalibrationError::Sequence(_)));
    }
    assert!(tracker.history().is_empty());
}

#[test]
fn test_out_of_order_timestamp_rejected() {
    let mut tracker = tracker();
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

    let mut first = record(5.0, 2.0);
    first.measured_at = Some(t0);
    tracker.append(first).unwrap();

    let mut earlier = record(4.0, 1.0);
    earlier.measured_at = Some(t0 - Duration::minutes(5));
    let err = tracker.append(earlier).unwrap_err();
    assert!(matches!(err, CalibrationError::Sequence(_)));
    assert_eq!(tracker.history().len(), 1);

    let mut later = record(4.0, 1.0);
    later.measured_at = Some(t0 + Duration::hours(1));
    tracker.append(later).unwrap();
    assert_eq!(tracker.history().len(), 2);
}

#[test]
fn test_window_size_from_config() {
    let mut tracker = ConvergenceTracker::new(ConvergenceConfig {
        window: 1,
        ..ConvergenceConfig::default()
    });
    assert_eq!(tracker.append(record(1.0, 0.1)).unwrap(), ConvergenceStatus::Converged);

    let mut tracker = ConvergenceTracker::new(ConvergenceConfig {
        window: 1,
        ..ConvergenceConfig::default()
    });
    // Divergence with K = 1 still needs one increase
    assert_eq!(tracker.append(record(5.0, 2.0)).unwrap(), ConvergenceStatus::Continue);
    assert_eq!(tracker.append(record(6.0, 2.0)).unwrap(), ConvergenceStatus::Diverged);
}

#[test]
fn test_trend_series_and_json() {
    let mut tracker = tracker();
    tracker.append(record(5.0, 2.0)).unwrap();
    tracker.append(record(3.0, 1.0)).unwrap();

    let trend = tracker.state().trend();
    assert_eq!(trend.len(), 2);
    assert_eq!(trend.overall_metric, vec![5.0, 3.0]);
    assert_eq!(trend.cyan, vec![2.0, 1.0]);
    assert_eq!(trend.magenta, vec![-2.0, -1.0]);
    assert_eq!(trend.a_bias, vec![-2.0, -1.0]);

    let json = tracker.state().history_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["status"], "CONTINUE");
    assert_eq!(value["history"].as_array().unwrap().len(), 2);
}

#[test]
fn test_zero_window_is_raised_to_one() {
    let mut tracker = ConvergenceTracker::new(ConvergenceConfig {
        window: 0,
        metric_threshold: f64::NAN,
        ..ConvergenceConfig::default()
    });
    assert_eq!(tracker.config().window, 1);
    assert_eq!(tracker.config().metric_threshold, 4.0);
    assert_eq!(tracker.append(record(1.0, 0.1)).unwrap(), ConvergenceStatus::Converged);
}
