//! CLI command implementations.

pub mod convergence;
pub mod events;
pub mod map;
pub mod networks;
pub mod overview;
pub mod pipeline;
pub mod reports;
pub mod thresholds;

use chrono::NaiveDate;
use clap::Args;

use crate::domain::models::{
    AlertLevel, CouplingPatternId, FilterState, MetabolicNetwork, DEFAULT_LIMIT, MAX_LIMIT,
};

/// Event filter facets shared by every event-backed view.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Metabolic network id (1-8); repeat to select several
    #[arg(short, long = "network", value_name = "ID", value_parser = parse_network)]
    pub networks: Vec<MetabolicNetwork>,

    /// Alert level; repeat to select several
    #[arg(short, long = "alert-level", value_name = "LEVEL", value_parser = parse_alert_level)]
    pub alert_levels: Vec<AlertLevel>,

    /// Coupling pattern id; repeat to select several
    #[arg(short = 'p', long = "pattern", value_name = "ID")]
    pub patterns: Vec<u32>,

    /// Country name (exact match upstream)
    #[arg(short, long)]
    pub country: Option<String>,

    /// Earliest event date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Latest event date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Minimum convergence index
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=8))]
    pub min_ci: u32,

    /// Page size
    #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_LIMIT)))]
    pub limit: u32,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

impl FilterArgs {
    /// Build a filter state. Selections keep the order given on the command
    /// line; a value given twice is selected once.
    pub fn to_filter(&self) -> FilterState {
        let mut filter = FilterState::new();
        for network in &self.networks {
            if !filter.networks.contains(network) {
                filter.toggle_network(*network);
            }
        }
        for level in &self.alert_levels {
            if !filter.alert_levels.contains(level) {
                filter.toggle_alert_level(*level);
            }
        }
        for pattern in self.patterns.iter().copied().map(CouplingPatternId) {
            if !filter.coupling_patterns.contains(&pattern) {
                filter.toggle_coupling_pattern(pattern);
            }
        }
        filter.country = self.country.clone().unwrap_or_default();
        filter.since = self.since;
        filter.until = self.until;
        filter.min_ci = self.min_ci;
        filter.limit = self.limit;
        filter.offset = self.offset;
        filter
    }

    /// Filter for views that aggregate over the feed: an unchanged page
    /// size widens to the largest page the service allows.
    pub fn to_aggregate_filter(&self) -> FilterState {
        let mut filter = self.to_filter();
        if filter.limit == DEFAULT_LIMIT {
            filter.limit = MAX_LIMIT;
        }
        filter
    }
}

pub fn parse_network(raw: &str) -> Result<MetabolicNetwork, String> {
    raw.parse::<u8>()
        .ok()
        .and_then(MetabolicNetwork::from_id)
        .ok_or_else(|| format!("unknown network '{raw}', expected 1-8"))
}

pub fn parse_alert_level(raw: &str) -> Result<AlertLevel, String> {
    AlertLevel::from_str(raw).ok_or_else(|| {
        format!("unknown alert level '{raw}', expected WATCH, MONITOR, ALERT, CRITICAL or SYSTEMIC")
    })
}
