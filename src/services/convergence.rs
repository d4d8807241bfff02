//! Convergence derivations over a working event collection.
//!
//! Hotspots and systemic nodes are ranked by Convergence Index with a stable
//! sort, so events at equal CI keep their feed order. Systemic nodes are
//! always hotspot-eligible but can fall outside the top-5 hotspot list.

use serde::Serialize;

use crate::domain::models::{
    AlertLevel, ConvergenceScore, CouplingPatternId, Event, MetabolicNetwork, NetworkSummary,
};

/// Minimum CI for an event to count as a hotspot candidate.
pub const HOTSPOT_MIN_CI: usize = 2;

/// Number of hotspots shown.
pub const HOTSPOT_LIMIT: usize = 5;

/// Minimum CI for a systemic node.
pub const SYSTEMIC_MIN_CI: usize = 4;

/// How often a coupling pattern occurs across a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternFrequency {
    pub pattern: CouplingPatternId,
    pub label: String,
    pub count: usize,
}

fn ranked_by_ci(events: &[Event], min_ci: usize) -> Vec<&Event> {
    let mut ranked: Vec<&Event> = events
        .iter()
        .filter(|e| e.convergence_index() >= min_ci)
        .collect();
    // stable: equal CI keeps feed order
    ranked.sort_by(|a, b| b.convergence_index().cmp(&a.convergence_index()));
    ranked
}

/// Top events by CI among those with CI >= 2, at most five.
pub fn hotspots(events: &[Event]) -> Vec<&Event> {
    let mut ranked = ranked_by_ci(events, HOTSPOT_MIN_CI);
    ranked.truncate(HOTSPOT_LIMIT);
    ranked
}

/// Every event with CI >= 4, ranked by CI. Not truncated.
pub fn systemic_nodes(events: &[Event]) -> Vec<&Event> {
    ranked_by_ci(events, SYSTEMIC_MIN_CI)
}

/// Occurrence count of each coupling pattern, most frequent first.
///
/// Ties keep the order in which patterns were first encountered while
/// walking the collection.
pub fn coupling_pattern_frequency(events: &[Event]) -> Vec<PatternFrequency> {
    // Vec keeps first-encounter order; the catalog is small enough for a scan.
    let mut tally: Vec<(CouplingPatternId, usize)> = Vec::new();
    for pattern in events.iter().flat_map(|e| e.coupling_patterns.iter()) {
        match tally.iter_mut().find(|(id, _)| id == pattern) {
            Some((_, count)) => *count += 1,
            None => tally.push((*pattern, 1)),
        }
    }
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
        .into_iter()
        .map(|(pattern, count)| PatternFrequency {
            pattern,
            label: pattern.label(),
            count,
        })
        .collect()
}

/// Per-network aggregates over an event collection.
///
/// Mirrors the upstream `networks` aggregation so a filtered working set can
/// be summarized without a round trip. Networks with no events report
/// `WATCH` as their maximum alert.
pub fn summarize_networks(events: &[Event]) -> Vec<NetworkSummary> {
    MetabolicNetwork::ALL
        .iter()
        .map(|network| {
            let tagged: Vec<&Event> = events
                .iter()
                .filter(|e| e.networks.contains(network))
                .collect();
            NetworkSummary {
                network_id: network.id(),
                roman: network.roman().to_string(),
                label: network.label().to_string(),
                event_count: tagged.len() as u64,
                convergent_count: tagged.iter().filter(|e| e.is_convergent()).count() as u64,
                threshold_crossings: tagged
                    .iter()
                    .map(|e| e.threshold_crossings.len() as u64)
                    .sum(),
                max_alert: tagged
                    .iter()
                    .map(|e| e.alert_level)
                    .max()
                    .unwrap_or(AlertLevel::Watch),
            }
        })
        .collect()
}

/// Stored convergence scores, highest weighted CI first. Equal scores keep
/// feed order.
pub fn rank_scores(scores: &[ConvergenceScore]) -> Vec<&ConvergenceScore> {
    let mut ranked: Vec<&ConvergenceScore> = scores.iter().collect();
    ranked.sort_by(|a, b| b.ci_score().total_cmp(&a.ci_score()));
    ranked
}
