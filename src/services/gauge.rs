//! Gauge model for threshold status entries.
//!
//! The status tier comes from upstream and is only mapped to a display
//! treatment here. The gauge itself is `current / threshold` as a percentage:
//! unclamped as `raw_percent`, capped at 120% for labels, and clamped to
//! 0..=100 for bar width.

use serde::Serialize;

use crate::domain::errors::{DashboardError, DashboardResult};
use crate::domain::models::{ThresholdStatus, ThresholdStatusEntry};

/// Highest overshoot reported in labels.
pub const OVERSHOOT_CAP_PERCENT: f64 = 120.0;

/// Bar width ceiling.
pub const FULL_BAR_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeColor {
    Green,
    Amber,
    Red,
}

/// How a status tier is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GaugeTreatment {
    pub color: GaugeColor,
    pub bold: bool,
}

impl GaugeTreatment {
    pub const fn for_status(status: ThresholdStatus) -> Self {
        match status {
            ThresholdStatus::Below => Self {
                color: GaugeColor::Green,
                bold: false,
            },
            ThresholdStatus::Approaching => Self {
                color: GaugeColor::Amber,
                bold: false,
            },
            ThresholdStatus::Exceeded => Self {
                color: GaugeColor::Red,
                bold: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeReading {
    /// `current / threshold * 100`, unclamped.
    pub raw_percent: f64,
    /// Raw value capped at the overshoot ceiling, for labels.
    pub reported_percent: f64,
    /// Raw value clamped to `0..=100`, for bar width.
    pub display_percent: f64,
    /// Upstream tier, verbatim.
    pub status: ThresholdStatus,
    pub treatment: GaugeTreatment,
}

/// Compute a gauge from raw values.
///
/// Fails with `InvalidMetric` for a zero threshold or any non-finite input
/// instead of letting `NaN`/`inf` reach layout.
pub fn gauge(
    metric: &str,
    current_value: f64,
    threshold_value: f64,
    status: ThresholdStatus,
) -> DashboardResult<GaugeReading> {
    if !current_value.is_finite() {
        return Err(DashboardError::invalid_metric(
            metric,
            format!("current value is not finite: {current_value}"),
        ));
    }
    if !threshold_value.is_finite() {
        return Err(DashboardError::invalid_metric(
            metric,
            format!("threshold value is not finite: {threshold_value}"),
        ));
    }
    if threshold_value == 0.0 {
        return Err(DashboardError::invalid_metric(metric, "threshold value is zero"));
    }

    let raw_percent = current_value / threshold_value * 100.0;
    if !raw_percent.is_finite() {
        return Err(DashboardError::invalid_metric(
            metric,
            "ratio overflowed",
        ));
    }

    Ok(GaugeReading {
        raw_percent,
        reported_percent: raw_percent.min(OVERSHOOT_CAP_PERCENT),
        display_percent: raw_percent.clamp(0.0, FULL_BAR_PERCENT),
        status,
        treatment: GaugeTreatment::for_status(status),
    })
}

/// Gauge for a `thresholds/status` entry.
pub fn classify(entry: &ThresholdStatusEntry) -> DashboardResult<GaugeReading> {
    gauge(
        &entry.metric_name,
        entry.current_value,
        entry.threshold_value,
        entry.status,
    )
}

/// Entries grouped EXCEEDED, APPROACHING, BELOW; feed order kept within a tier.
pub fn group_by_tier(entries: &[ThresholdStatusEntry]) -> Vec<&ThresholdStatusEntry> {
    let mut grouped: Vec<&ThresholdStatusEntry> = entries.iter().collect();
    grouped.sort_by(|a, b| b.status.cmp(&a.status));
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AlertLevel, ThresholdCategory};
    use chrono::NaiveDate;

    fn entry(name: &str, current: f64, threshold: f64, status: ThresholdStatus) -> ThresholdStatusEntry {
        ThresholdStatusEntry {
            event_id: "e1".to_string(),
            event_title: "Test".to_string(),
            metric_name: name.to_string(),
            category: ThresholdCategory::Absolute,
            baseline_value: 0.0,
            baseline_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            delta: current,
            current_value: current,
            threshold_value: threshold,
            unit: "persons".to_string(),
            status,
            alert_level: AlertLevel::Alert,
            comparison: String::new(),
        }
    }

    #[test]
    fn test_fraction_within_threshold() {
        let reading = gauge("m", 50.0, 200.0, ThresholdStatus::Below).unwrap();
        assert!((reading.raw_percent - 25.0).abs() < f64::EPSILON);
        assert!((reading.display_percent - 25.0).abs() < f64::EPSILON);
        assert_eq!(reading.treatment.color, GaugeColor::Green);
    }

    #[test]
    fn test_overshoot_is_capped_and_clamped() {
        let reading = gauge("m", 150_000.0, 100_000.0, ThresholdStatus::Exceeded).unwrap();
        assert!((reading.raw_percent - 150.0).abs() < 1e-9);
        assert!((reading.reported_percent - 120.0).abs() < f64::EPSILON);
        assert!((reading.display_percent - 100.0).abs() < f64::EPSILON);
        assert!(reading.treatment.bold);
    }

    #[test]
    fn test_status_is_taken_verbatim() {
        // upstream says BELOW even though the value is past the threshold
        let reading = gauge("m", 130.0, 100.0, ThresholdStatus::Below).unwrap();
        assert_eq!(reading.status, ThresholdStatus::Below);
        assert_eq!(reading.treatment.color, GaugeColor::Green);
    }

    #[test]
    fn test_negative_ratio_clamps_to_empty_bar() {
        let reading = gauge("m", -10.0, 100.0, ThresholdStatus::Below).unwrap();
        assert!(reading.raw_percent < 0.0);
        assert!(reading.display_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_threshold_is_invalid() {
        let err = gauge("fpic_weakened", 1.0, 0.0, ThresholdStatus::Exceeded).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidMetric { ref metric, .. } if metric == "fpic_weakened"));
    }

    #[test]
    fn test_non_finite_inputs_are_invalid() {
        assert!(gauge("m", f64::NAN, 1.0, ThresholdStatus::Below).is_err());
        assert!(gauge("m", 1.0, f64::INFINITY, ThresholdStatus::Below).is_err());
        assert!(gauge("m", f64::MAX, f64::MIN_POSITIVE, ThresholdStatus::Below).is_err());
    }

    #[test]
    fn test_classify_entry() {
        let e = entry("displacement", 90_000.0, 100_000.0, ThresholdStatus::Approaching);
        let reading = classify(&e).unwrap();
        assert!((reading.raw_percent - 90.0).abs() < 1e-9);
        assert_eq!(reading.treatment.color, GaugeColor::Amber);
    }

    #[test]
    fn test_group_by_tier() {
        let entries = vec![
            entry("a", 1.0, 2.0, ThresholdStatus::Below),
            entry("b", 1.0, 2.0, ThresholdStatus::Exceeded),
            entry("c", 1.0, 2.0, ThresholdStatus::Approaching),
            entry("d", 1.0, 2.0, ThresholdStatus::Exceeded),
        ];
        let names: Vec<&str> = group_by_tier(&entries)
            .iter()
            .map(|e| e.metric_name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "d", "c", "a"]);
    }
}
