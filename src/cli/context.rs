//! Shared state for one CLI invocation.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

use crate::cli::display::with_spinner;
use crate::domain::models::Config;
use crate::domain::ports::DashboardApi;
use crate::infrastructure::api::{ApiClientConfig, CachedDashboardApi, HttpDashboardApi};
use crate::services::geo::GeoProjector;
use crate::services::query_cache::DEFAULT_STALE_AFTER_SECS;

pub struct DashboardContext {
    pub api: Arc<dyn DashboardApi>,
    pub config: Config,
    pub json: bool,
}

impl DashboardContext {
    /// Wire the cached HTTP client from configuration.
    pub fn from_config(config: Config, json: bool) -> Result<Self> {
        let http = HttpDashboardApi::with_config(ApiClientConfig::from(&config))?;
        let stale_after = std::time::Duration::from_secs(config.fetch.stale_after_secs);
        let stale_after = chrono::Duration::from_std(stale_after)
            .unwrap_or_else(|_| chrono::Duration::seconds(DEFAULT_STALE_AFTER_SECS));
        let api = CachedDashboardApi::with_staleness(Arc::new(http), stale_after);
        Ok(Self::with_api(Arc::new(api), config, json))
    }

    pub fn with_api(api: Arc<dyn DashboardApi>, config: Config, json: bool) -> Self {
        Self { api, config, json }
    }

    pub fn projector(&self) -> GeoProjector {
        GeoProjector::from(self.config.canvas)
    }

    /// Await `fut` behind a loading spinner (suppressed in JSON mode).
    pub async fn load<F, T>(&self, message: &str, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        with_spinner(message, self.json, fut).await
    }
}
