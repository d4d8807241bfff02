//! Event domain model.
//!
//! Events are immutable snapshots produced by the analytical service. They
//! are replaced wholesale on refetch and never edited field by field.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::threshold::ThresholdMetric;
use super::timestamp;
use super::vocabulary::{
    AlertLevel, AnalyticalLayer, CouplingPatternId, MetabolicNetwork, OntologyNode, SourceTier,
};

/// Literal marker the upstream service writes into unfinished narratives.
pub const PENDING_MARKER: &str = "[PENDING]";

/// An actor involved in appropriation, governance, or resistance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    /// e.g. "corporation", "state", "community"
    pub actor_type: String,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// e.g. "extractor", "enabler", "resister"
    pub role: String,
}

/// A source citation following the source hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub organization: String,
    pub report_name: String,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub report_id: Option<String>,
    pub tier: SourceTier,
    pub access_date: NaiveDate,
    #[serde(default)]
    pub provisional: bool,
}

impl Source {
    /// Citation line: organization, report name, then DOI or report id.
    pub fn citation(&self) -> String {
        let mut parts = vec![self.organization.as_str(), self.report_name.as_str()];
        if let Some(doi) = &self.doi {
            parts.push(doi);
        } else if let Some(report_id) = &self.report_id {
            parts.push(report_id);
        }
        parts.join(" \u{2014} ")
    }
}

/// A detected threshold crossing attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCrossing {
    pub metric: ThresholdMetric,
    #[serde(with = "timestamp")]
    pub detected_at: DateTime<Utc>,
    pub alert_level: AlertLevel,
    #[serde(default)]
    pub notes: String,
}

/// A tagged analytical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub event_date: NaiveDate,
    #[serde(with = "timestamp")]
    pub detected_at: DateTime<Utc>,

    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    /// `(latitude, longitude)` in degrees.
    #[serde(default)]
    pub coordinates: Option<(f64, f64)>,

    pub networks: Vec<MetabolicNetwork>,
    #[serde(default)]
    pub layers: Vec<AnalyticalLayer>,
    #[serde(default)]
    pub nodes: Vec<OntologyNode>,
    #[serde(default)]
    pub coupling_patterns: Vec<CouplingPatternId>,

    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub threshold_crossings: Vec<ThresholdCrossing>,
    #[serde(default)]
    pub sources: Vec<Source>,

    #[serde(default)]
    pub alert_level: AlertLevel,

    #[serde(default)]
    pub resistance_summary: Option<String>,
    #[serde(default)]
    pub governance_context: Option<String>,
    #[serde(default)]
    pub outlook_30d: Option<String>,
}

impl Event {
    /// Convergence Index: the number of distinct networks tagged to the event.
    ///
    /// Always derived from `networks`; never stored.
    pub fn convergence_index(&self) -> usize {
        self.networks.iter().collect::<BTreeSet<_>>().len()
    }

    /// CI >= 2.
    pub fn is_convergent(&self) -> bool {
        self.convergence_index() >= 2
    }

    /// CI >= 4.
    pub fn is_systemic(&self) -> bool {
        self.convergence_index() >= 4
    }

    /// Distinct networks in id order.
    pub fn distinct_networks(&self) -> Vec<MetabolicNetwork> {
        self.networks
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `I: Carbon Accumulation, IV: Mineral Extraction`
    pub fn network_labels(&self) -> String {
        self.distinct_networks()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Compact roman codes, e.g. `I·IV·VII`.
    pub fn network_codes(&self) -> String {
        self.distinct_networks()
            .iter()
            .map(|n| n.roman())
            .collect::<Vec<_>>()
            .join("\u{b7}")
    }
}

/// Paginated `events` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    pub items: Vec<Event>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

impl EventPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::event_with_networks;
    use super::*;

    #[test]
    fn test_convergence_index_counts_networks() {
        let event = event_with_networks("e1", &[2, 5, 7]);
        assert_eq!(event.convergence_index(), 3);
        assert!(event.is_convergent());
        assert!(!event.is_systemic());
    }

    #[test]
    fn test_convergence_index_ignores_duplicates() {
        let event = event_with_networks("e1", &[4, 4, 1]);
        assert_eq!(event.convergence_index(), 2);
        assert_eq!(event.network_codes(), "I\u{b7}IV");
    }

    #[test]
    fn test_network_labels_sorted_by_id() {
        let event = event_with_networks("e1", &[7, 1]);
        assert_eq!(
            event.network_labels(),
            "I: Carbon Accumulation, VII: Ocean & Marine Appropriation"
        );
    }

    #[test]
    fn test_decode_upstream_event() {
        let json = serde_json::json!({
            "id": "evt-001",
            "title": "Lithium brine extraction expands",
            "summary": "Water table drawdown near salt flats",
            "event_date": "2025-02-14",
            "detected_at": "2025-02-15T08:30:00",
            "country": "Chile",
            "region": "Antofagasta",
            "coordinates": [-23.65, -70.4],
            "networks": [2, 4],
            "layers": ["flow", "contestation"],
            "nodes": ["appropriation", "resistance"],
            "coupling_patterns": [3, 14],
            "sources": [{
                "organization": "OLCA",
                "report_name": "Salar monitoring",
                "tier": 1,
                "access_date": "2025-02-15"
            }],
            "alert_level": "ALERT",
            "resistance_summary": "Atacameño communities filed injunction"
        });

        let event: Event = serde_json::from_value(json).unwrap();
        assert_eq!(event.convergence_index(), 2);
        assert_eq!(event.coordinates, Some((-23.65, -70.4)));
        assert_eq!(event.coupling_patterns[1], CouplingPatternId(14));
        assert_eq!(event.alert_level, AlertLevel::Alert);
        assert_eq!(event.sources[0].citation(), "OLCA \u{2014} Salar monitoring");
        assert_eq!(event.detected_at.to_rfc3339(), "2025-02-15T08:30:00+00:00");
    }

    #[test]
    fn test_citation_prefers_doi() {
        let source = Source {
            organization: "IDMC".to_string(),
            report_name: "GRID 2025".to_string(),
            doi: Some("10.1000/xyz".to_string()),
            report_id: Some("R-9".to_string()),
            tier: SourceTier::UnOperational,
            access_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            provisional: false,
        };
        assert_eq!(source.citation(), "IDMC \u{2014} GRID 2025 \u{2014} 10.1000/xyz");
    }
}
