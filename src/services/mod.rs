//! Derivation and fetch-coordination services
//!
//! Everything except `query_cache` is synchronous and pure: the derived views
//! are functions of the fetched collections and the filter state.

pub mod alert_ticker;
pub mod convergence;
pub mod gauge;
pub mod geo;
pub mod heatmap;
pub mod overview;
pub mod query_cache;
pub mod resistance;
pub mod view_state;

pub use alert_ticker::{ticker, truncate_title, TickerItem};
pub use convergence::{
    coupling_pattern_frequency, hotspots, summarize_networks, systemic_nodes, PatternFrequency,
};
pub use gauge::{GaugeColor, GaugeReading, GaugeTreatment};
pub use geo::{marker_radius, GeoProjector, MapLayer, Marker, Point};
pub use heatmap::Heatmap;
pub use overview::{OverviewSnapshot, RankedEvent};
pub use query_cache::{CacheEntry, QueryCache};
pub use resistance::{resistance_status, ResistanceStatus};
pub use view_state::{RequestTicket, ViewData, ViewSlot, ViewState};
