//! Threshold metrics, definitions, and active-crossing status entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::vocabulary::{AlertLevel, MetabolicNetwork, ThresholdCategory, ThresholdStatus};

/// A metric with its baseline, delta, current value and threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMetric {
    pub name: String,
    pub category: ThresholdCategory,
    #[serde(default)]
    pub networks: Vec<MetabolicNetwork>,
    pub baseline_value: f64,
    pub baseline_date: NaiveDate,
    pub delta: f64,
    pub current_value: f64,
    pub threshold_value: f64,
    pub unit: String,
    pub status: ThresholdStatus,
}

/// One row of `thresholds/status`: an active crossing flattened with its event.
///
/// `status` is authoritative. No relation between `current_value` and
/// `threshold_value` is assumed or checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStatusEntry {
    pub event_id: String,
    pub event_title: String,
    pub metric_name: String,
    pub category: ThresholdCategory,
    pub baseline_value: f64,
    pub baseline_date: NaiveDate,
    pub delta: f64,
    pub current_value: f64,
    pub threshold_value: f64,
    pub unit: String,
    pub status: ThresholdStatus,
    pub alert_level: AlertLevel,
    /// Upstream comparison narrative.
    #[serde(default)]
    pub comparison: String,
}

/// A threshold definition from `thresholds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDefinition {
    pub name: String,
    pub category: ThresholdCategory,
    pub description: String,
    pub networks: Vec<MetabolicNetwork>,
    pub threshold_value: f64,
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_status_entry() {
        let json = serde_json::json!({
            "event_id": "evt-7",
            "event_title": "Mass displacement after dam breach",
            "metric_name": "displacement_single_event",
            "category": "absolute",
            "baseline_value": 20000.0,
            "baseline_date": "2024-12-01",
            "delta": 95000.0,
            "current_value": 115000.0,
            "threshold_value": 100000.0,
            "unit": "persons",
            "status": "EXCEEDED",
            "alert_level": "CRITICAL",
            "comparison": "20,000.0 persons (2024-12-01) + +95,000.0 = 115,000.0 <= 100,000.0 [EXCEEDED]"
        });

        let entry: ThresholdStatusEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.status, ThresholdStatus::Exceeded);
        assert_eq!(entry.category, ThresholdCategory::Absolute);
        assert_eq!(entry.alert_level, AlertLevel::Critical);
    }

    #[test]
    fn test_decode_definition_networks() {
        let json = serde_json::json!({
            "name": "corporate_water_vs_domestic",
            "category": "relational",
            "description": "Corporate water extraction exceeding domestic supply",
            "networks": [2],
            "threshold_value": 1.0,
            "unit": "extraction/supply ratio"
        });

        let def: ThresholdDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(def.networks, vec![MetabolicNetwork::Water]);
        assert_eq!(def.category, ThresholdCategory::Relational);
    }
}
