//! SMAE Dashboard - operator console for socio-metabolic event analytics
//!
//! Reads events, network summaries, threshold status and pipeline runs from
//! the analytical service and derives the operator views locally: convergence
//! rankings, severity gauges, the co-occurrence heatmap, the geographic marker
//! layer and the alert ticker.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Vocabulary, entity snapshots, filter state and the `DashboardApi` port
//! - **Service Layer** (`services`): Pure view derivations plus fetch coordination
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, response cache, configuration, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use smae_dashboard::infrastructure::api::{ApiClientConfig, CachedDashboardApi, HttpDashboardApi};
//! use smae_dashboard::{DashboardApi, FilterState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let http = HttpDashboardApi::with_config(ApiClientConfig::default())?;
//!     let api = CachedDashboardApi::new(Arc::new(http));
//!     let page = api.list_events(&FilterState::default()).await?;
//!     println!("{} events", page.total);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AlertLevel, Config, ConvergenceMatrix, Event, EventPage, FilterState, MetabolicNetwork,
    NetworkSummary, PipelineStatus, ThresholdStatusEntry,
};
pub use domain::ports::DashboardApi;
pub use domain::{DashboardError, DashboardResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{GeoProjector, OverviewSnapshot, QueryCache, RankedEvent};
