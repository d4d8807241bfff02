//! Filter facet state and its canonical query key.
//!
//! The filter state is the only entity with a write lifecycle. Multi-value
//! facets are ordered selections: toggling appends new ids and removes
//! existing ones without disturbing the order of the rest. The selection
//! order is user-visible and is kept in the query key as-is.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::vocabulary::{AlertLevel, CouplingPatternId, MetabolicNetwork};

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 50;

/// Largest page size the service accepts.
pub const MAX_LIMIT: u32 = 200;

/// An insertion-ordered set with append-on-add, order-preserving-remove toggling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedSelection<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedSelection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq + Copy> OrderedSelection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `item` if selected, otherwise append it. Returns `true` when the
    /// item is selected afterwards.
    pub fn toggle(&mut self, item: T) -> bool {
        if let Some(pos) = self.items.iter().position(|x| *x == item) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(item);
            true
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Selected items in selection order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: PartialEq + Copy> FromIterator<T> for OrderedSelection<T> {
    /// Builds a selection by toggling each item in turn.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut selection = Self::new();
        for item in iter {
            if !selection.contains(&item) {
                selection.toggle(item);
            }
        }
        selection
    }
}

/// Facet state for the event list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub networks: OrderedSelection<MetabolicNetwork>,
    pub alert_levels: OrderedSelection<AlertLevel>,
    pub coupling_patterns: OrderedSelection<CouplingPatternId>,
    pub country: String,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub min_ci: u32,
    pub limit: u32,
    pub offset: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            networks: OrderedSelection::new(),
            alert_levels: OrderedSelection::new(),
            coupling_patterns: OrderedSelection::new(),
            country: String::new(),
            since: None,
            until: None,
            min_ci: 1,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_network(&mut self, network: MetabolicNetwork) -> bool {
        self.networks.toggle(network)
    }

    pub fn toggle_alert_level(&mut self, level: AlertLevel) -> bool {
        self.alert_levels.toggle(level)
    }

    pub fn toggle_coupling_pattern(&mut self, pattern: CouplingPatternId) -> bool {
        self.coupling_patterns.toggle(pattern)
    }

    /// Restore every facet to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Query parameters in canonical facet order.
    ///
    /// `country` is omitted when blank after trimming and `min_ci` is omitted
    /// unless strictly greater than 1, since every event has CI >= 1.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for network in self.networks.iter() {
            pairs.push(("network", network.id().to_string()));
        }
        for level in self.alert_levels.iter() {
            pairs.push(("alert_level", level.as_str().to_string()));
        }
        for pattern in self.coupling_patterns.iter() {
            pairs.push(("coupling_pattern", pattern.0.to_string()));
        }
        let country = self.country.trim();
        if !country.is_empty() {
            pairs.push(("country", country.to_string()));
        }
        if let Some(since) = self.since {
            pairs.push(("since", since.to_string()));
        }
        if let Some(until) = self.until {
            pairs.push(("until", until.to_string()));
        }
        if self.min_ci > 1 {
            pairs.push(("min_ci", self.min_ci.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }

    /// Canonical cache key for the `events` query.
    pub fn query_key(&self) -> String {
        query_key("events", &self.query_pairs())
    }
}

/// Build a cache key from a resource path and ordered query pairs.
///
/// Keys without parameters are the bare path so that action invalidation
/// can name them directly.
pub fn query_key(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(name, value)| format!("{}={}", encode_component(name), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
