//! Network aggregates and the co-occurrence matrix.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::vocabulary::{AlertLevel, AnalyticalLayer, MetabolicNetwork};
use crate::domain::errors::{DashboardError, DashboardResult};

/// Per-network aggregate from `networks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub network_id: u8,
    pub roman: String,
    pub label: String,
    pub event_count: u64,
    pub convergent_count: u64,
    pub threshold_crossings: u64,
    pub max_alert: AlertLevel,
}

/// Event reference listed under an analytical layer in a network detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEventRef {
    pub id: String,
    pub title: String,
    pub country: String,
    pub alert_level: AlertLevel,
    pub event_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResistanceSpotlight {
    pub id: String,
    pub title: String,
    pub country: String,
    #[serde(default)]
    pub resistance_summary: Option<String>,
}

/// `networks/{id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDetail {
    pub network_id: u8,
    pub roman: String,
    pub label: String,
    pub event_count: u64,
    #[serde(default)]
    pub layers: BTreeMap<AnalyticalLayer, Vec<LayerEventRef>>,
    #[serde(default)]
    pub resistance_spotlight: Vec<ResistanceSpotlight>,
}

/// N labels and an N x N matrix of pairwise co-occurrence counts.
///
/// No symmetry is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceMatrix {
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<u64>>,
}

impl ConvergenceMatrix {
    pub fn dimension(&self) -> usize {
        self.labels.len()
    }

    /// Check the matrix is square with one row/column per label.
    pub fn validate(&self) -> DashboardResult<()> {
        let n = self.labels.len();
        if self.matrix.len() != n {
            return Err(DashboardError::InvalidMatrix(format!(
                "{} labels but {} rows",
                n,
                self.matrix.len()
            )));
        }
        if let Some((row, cells)) = self.matrix.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(DashboardError::InvalidMatrix(format!(
                "row {row} has {} cells, expected {n}",
                cells.len()
            )));
        }
        Ok(())
    }

    /// Largest cell value, `None` for an empty matrix.
    pub fn max_cell(&self) -> Option<u64> {
        self.matrix.iter().flatten().copied().max()
    }
}

/// Tier of a convergence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceClass {
    SingleNetwork,
    MultiNetwork,
    SystemicNode,
}

impl ConvergenceClass {
    pub const fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            Self::SystemicNode
        } else if score >= 2.0 {
            Self::MultiNetwork
        } else {
            Self::SingleNetwork
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleNetwork => "Single-network",
            Self::MultiNetwork => "Multi-network",
            Self::SystemicNode => "Systemic node",
        }
    }

    pub const fn recommended_action(self) -> &'static str {
        match self {
            Self::SingleNetwork => "Monitor per network thresholds",
            Self::MultiNetwork => "Escalate to cross-network analysis",
            Self::SystemicNode => "Immediate high-priority briefing, structural analysis",
        }
    }
}

/// One record from `convergence`: the networks an event touches and the
/// optional per-network severity weights of the latest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceScore {
    pub event_id: String,
    pub networks: Vec<MetabolicNetwork>,
    #[serde(default)]
    pub severity_weights: BTreeMap<MetabolicNetwork, f64>,
}

impl ConvergenceScore {
    /// Weighted convergence index over distinct networks.
    ///
    /// Without weights this is the distinct network count; a network missing
    /// from a non-empty weight table counts 1.0.
    pub fn ci_score(&self) -> f64 {
        let distinct: BTreeSet<MetabolicNetwork> = self.networks.iter().copied().collect();
        if self.severity_weights.is_empty() {
            return distinct.len() as f64;
        }
        distinct
            .iter()
            .map(|n| self.severity_weights.get(n).copied().unwrap_or(1.0))
            .sum()
    }

    pub fn classification(&self) -> ConvergenceClass {
        ConvergenceClass::from_score(self.ci_score())
    }

    pub fn recommended_alert_level(&self) -> AlertLevel {
        let score = self.ci_score();
        if score >= 4.0 {
            AlertLevel::Systemic
        } else if score >= 3.0 {
            AlertLevel::Critical
        } else if score >= 2.0 {
            AlertLevel::Alert
        } else {
            AlertLevel::Monitor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_square_matrix() {
        let m = ConvergenceMatrix {
            labels: vec!["A".into(), "B".into()],
            matrix: vec![vec![5, 0], vec![0, 5]],
        };
        assert!(m.validate().is_ok());
        assert_eq!(m.max_cell(), Some(5));
    }

    #[test]
    fn test_validate_rejects_ragged_rows() {
        let m = ConvergenceMatrix {
            labels: vec!["A".into(), "B".into()],
            matrix: vec![vec![1, 2], vec![3]],
        };
        assert!(matches!(m.validate(), Err(DashboardError::InvalidMatrix(_))));
    }

    #[test]
    fn test_validate_rejects_label_mismatch() {
        let m = ConvergenceMatrix {
            labels: vec!["A".into()],
            matrix: vec![vec![1, 2], vec![3, 4]],
        };
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_decode_network_detail_layers() {
        let json = serde_json::json!({
            "network_id": 4,
            "roman": "IV",
            "label": "Mineral Extraction",
            "event_count": 1,
            "layers": {
                "flow": [{
                    "id": "e1",
                    "title": "Cobalt corridor",
                    "country": "DRC",
                    "alert_level": "CRITICAL",
                    "event_date": "2025-01-10"
                }]
            },
            "resistance_spotlight": []
        });
        let detail: NetworkDetail = serde_json::from_value(json).unwrap();
        assert_eq!(detail.layers[&AnalyticalLayer::Flow].len(), 1);
    }

    #[test]
    fn test_unweighted_score_counts_distinct_networks() {
        let score: ConvergenceScore = serde_json::from_value(serde_json::json!({
            "event_id": "e1",
            "networks": [1, 4, 4, 7]
        }))
        .unwrap();
        assert!((score.ci_score() - 3.0).abs() < f64::EPSILON);
        assert_eq!(score.classification(), ConvergenceClass::MultiNetwork);
        assert_eq!(score.recommended_alert_level(), AlertLevel::Critical);
    }

    #[test]
    fn test_weighted_score_defaults_missing_weights() {
        let score: ConvergenceScore = serde_json::from_value(serde_json::json!({
            "event_id": "e2",
            "networks": [1, 2, 3],
            "severity_weights": {"1": 2.0, "2": 0.5}
        }))
        .unwrap();
        assert!((score.ci_score() - 3.5).abs() < f64::EPSILON);
        assert_eq!(score.severity_weights.get(&MetabolicNetwork::Carbon), Some(&2.0));
    }

    #[test]
    fn test_convergence_class_boundaries() {
        assert_eq!(ConvergenceClass::from_score(1.0), ConvergenceClass::SingleNetwork);
        assert_eq!(ConvergenceClass::from_score(1.99), ConvergenceClass::SingleNetwork);
        assert_eq!(ConvergenceClass::from_score(2.0), ConvergenceClass::MultiNetwork);
        assert_eq!(ConvergenceClass::from_score(4.0), ConvergenceClass::SystemicNode);
        assert_eq!(ConvergenceClass::SystemicNode.label(), "Systemic node");
    }

    #[test]
    fn test_single_network_recommends_monitoring() {
        let score = ConvergenceScore {
            event_id: "e3".to_string(),
            networks: vec![MetabolicNetwork::Carbon],
            severity_weights: BTreeMap::new(),
        };
        assert_eq!(score.recommended_alert_level(), AlertLevel::Monitor);
        assert_eq!(
            score.classification().recommended_action(),
            "Monitor per network thresholds"
        );
    }
}
