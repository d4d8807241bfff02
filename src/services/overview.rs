//! Dashboard overview derived from an event collection.
//!
//! Every panel is recomputed from the same inputs on each change; nothing
//! here depends on render order or retains state between derivations.

use serde::Serialize;

use super::alert_ticker::{self, TickerItem};
use super::convergence::{self, PatternFrequency};
use super::geo::{GeoProjector, MapLayer};
use super::resistance::{resistance_status, ResistanceStatus};
use crate::domain::models::{AlertLevel, Event, NetworkSummary};

/// Row used by ranked lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEvent {
    pub event_id: String,
    pub title: String,
    pub country: String,
    pub convergence_index: usize,
    pub network_codes: String,
    pub alert_level: AlertLevel,
    pub resistance: ResistanceStatus,
}

impl From<&Event> for RankedEvent {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            country: event.country.clone(),
            convergence_index: event.convergence_index(),
            network_codes: event.network_codes(),
            alert_level: event.alert_level,
            resistance: resistance_status(event),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSnapshot {
    pub total_events: usize,
    /// `None` suppresses the ticker entirely.
    pub ticker: Option<Vec<TickerItem>>,
    pub hotspots: Vec<RankedEvent>,
    pub systemic_nodes: Vec<RankedEvent>,
    pub coupling_patterns: Vec<PatternFrequency>,
    pub map: MapLayer,
    pub networks: Vec<NetworkSummary>,
}

impl OverviewSnapshot {
    pub fn derive(events: &[Event], projector: &GeoProjector) -> Self {
        Self {
            total_events: events.len(),
            ticker: alert_ticker::ticker(events),
            hotspots: convergence::hotspots(events)
                .into_iter()
                .map(RankedEvent::from)
                .collect(),
            systemic_nodes: convergence::systemic_nodes(events)
                .into_iter()
                .map(RankedEvent::from)
                .collect(),
            coupling_patterns: convergence::coupling_pattern_frequency(events),
            map: projector.layer(events),
            networks: convergence::summarize_networks(events),
        }
    }
}
