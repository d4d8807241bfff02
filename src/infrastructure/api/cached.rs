//! Cached wrapper for `DashboardApi`.
//!
//! Every read is cached under its canonical query key for the staleness
//! window, with concurrent identical reads sharing one request. Actions are
//! passed through and, on success, invalidate exactly the keys they affect.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::info;

use crate::domain::errors::DashboardResult;
use crate::domain::models::{
    encode_component, query_key, ConvergenceMatrix, ConvergenceScore, Event, EventPage,
    FilterState, GeneratedReport, NetworkDetail, NetworkSummary, PipelineRun, PipelineStatus,
    Report, ReportRequest, ThresholdDefinition, ThresholdStatusEntry, TriggeredRun,
};
use crate::domain::ports::DashboardApi;
use crate::services::query_cache::{QueryCache, DEFAULT_STALE_AFTER_SECS};

/// Keys invalidated after a computation run is triggered.
pub const RUN_INVALIDATES: [&str; 2] = ["pipeline/status", "pipeline/history"];

/// Keys invalidated after a report is generated.
pub const REPORT_INVALIDATES: [&str; 1] = ["reports"];

/// One cache per response type, all sharing the same key space.
struct Caches {
    events: QueryCache<EventPage>,
    event: QueryCache<Event>,
    networks: QueryCache<Vec<NetworkSummary>>,
    network: QueryCache<NetworkDetail>,
    matrix: QueryCache<ConvergenceMatrix>,
    scores: QueryCache<Vec<ConvergenceScore>>,
    threshold_definitions: QueryCache<Vec<ThresholdDefinition>>,
    threshold_status: QueryCache<Vec<ThresholdStatusEntry>>,
    pipeline_status: QueryCache<PipelineStatus>,
    pipeline_history: QueryCache<Vec<PipelineRun>>,
    reports: QueryCache<Vec<Report>>,
}

impl Caches {
    fn new(stale_after: Duration) -> Self {
        Self {
            events: QueryCache::new(stale_after),
            event: QueryCache::new(stale_after),
            networks: QueryCache::new(stale_after),
            network: QueryCache::new(stale_after),
            matrix: QueryCache::new(stale_after),
            scores: QueryCache::new(stale_after),
            threshold_definitions: QueryCache::new(stale_after),
            threshold_status: QueryCache::new(stale_after),
            pipeline_status: QueryCache::new(stale_after),
            pipeline_history: QueryCache::new(stale_after),
            reports: QueryCache::new(stale_after),
        }
    }

    async fn invalidate(&self, keys: &[&str]) -> usize {
        self.events.invalidate(keys).await
            + self.event.invalidate(keys).await
            + self.networks.invalidate(keys).await
            + self.network.invalidate(keys).await
            + self.matrix.invalidate(keys).await
            + self.scores.invalidate(keys).await
            + self.threshold_definitions.invalidate(keys).await
            + self.threshold_status.invalidate(keys).await
            + self.pipeline_status.invalidate(keys).await
            + self.pipeline_history.invalidate(keys).await
            + self.reports.invalidate(keys).await
    }

    async fn entry_count(&self) -> u64 {
        self.events.entry_count().await
            + self.event.entry_count().await
            + self.networks.entry_count().await
            + self.network.entry_count().await
            + self.matrix.entry_count().await
            + self.scores.entry_count().await
            + self.threshold_definitions.entry_count().await
            + self.threshold_status.entry_count().await
            + self.pipeline_status.entry_count().await
            + self.pipeline_history.entry_count().await
            + self.reports.entry_count().await
    }
}

/// Cached dashboard API decorator.
pub struct CachedDashboardApi<A: DashboardApi> {
    inner: Arc<A>,
    caches: Caches,
}

impl<A: DashboardApi + 'static> CachedDashboardApi<A> {
    /// Create with the default 30 second staleness window.
    pub fn new(inner: Arc<A>) -> Self {
        Self::with_staleness(inner, Duration::seconds(DEFAULT_STALE_AFTER_SECS))
    }

    pub fn with_staleness(inner: Arc<A>, stale_after: Duration) -> Self {
        Self {
            inner,
            caches: Caches::new(stale_after),
        }
    }

    /// Number of cached entries across all response types.
    pub async fn cached_entries(&self) -> u64 {
        self.caches.entry_count().await
    }

    pub fn inner(&self) -> &Arc<A> {
        &self.inner
    }
}

#[async_trait]
impl<A: DashboardApi + 'static> DashboardApi for CachedDashboardApi<A> {
    async fn list_events(&self, filter: &FilterState) -> DashboardResult<EventPage> {
        let inner = Arc::clone(&self.inner);
        let filter = filter.clone();
        let key = filter.query_key();
        self.caches
            .events
            .get_or_fetch(&key, async move { inner.list_events(&filter).await })
            .await
    }

    async fn get_event(&self, id: &str) -> DashboardResult<Event> {
        let inner = Arc::clone(&self.inner);
        let id = id.to_string();
        let key = query_key(&format!("events/{}", encode_component(&id)), &[]);
        self.caches
            .event
            .get_or_fetch(&key, async move { inner.get_event(&id).await })
            .await
    }

    async fn list_networks(&self) -> DashboardResult<Vec<NetworkSummary>> {
        let inner = Arc::clone(&self.inner);
        self.caches
            .networks
            .get_or_fetch("networks", async move { inner.list_networks().await })
            .await
    }

    async fn get_network(&self, network_id: u8) -> DashboardResult<NetworkDetail> {
        let inner = Arc::clone(&self.inner);
        let key = format!("networks/{network_id}");
        self.caches
            .network
            .get_or_fetch(&key, async move { inner.get_network(network_id).await })
            .await
    }

    async fn convergence_matrix(&self) -> DashboardResult<ConvergenceMatrix> {
        let inner = Arc::clone(&self.inner);
        self.caches
            .matrix
            .get_or_fetch("convergence/matrix", async move {
                inner.convergence_matrix().await
            })
            .await
    }

    async fn convergence_scores(&self) -> DashboardResult<Vec<ConvergenceScore>> {
        let inner = Arc::clone(&self.inner);
        self.caches
            .scores
            .get_or_fetch("convergence", async move { inner.convergence_scores().await })
            .await
    }

    async fn threshold_definitions(&self) -> DashboardResult<Vec<ThresholdDefinition>> {
        let inner = Arc::clone(&self.inner);
        self.caches
            .threshold_definitions
            .get_or_fetch("thresholds", async move {
                inner.threshold_definitions().await
            })
            .await
    }

    async fn threshold_status(&self) -> DashboardResult<Vec<ThresholdStatusEntry>> {
        let inner = Arc::clone(&self.inner);
        self.caches
            .threshold_status
            .get_or_fetch("thresholds/status", async move {
                inner.threshold_status().await
            })
            .await
    }

    async fn pipeline_status(&self) -> DashboardResult<PipelineStatus> {
        let inner = Arc::clone(&self.inner);
        self.caches
            .pipeline_status
            .get_or_fetch("pipeline/status", async move { inner.pipeline_status().await })
            .await
    }

    async fn pipeline_history(&self) -> DashboardResult<Vec<PipelineRun>> {
        let inner = Arc::clone(&self.inner);
        self.caches
            .pipeline_history
            .get_or_fetch("pipeline/history", async move {
                inner.pipeline_history().await
            })
            .await
    }

    async fn trigger_run(&self, lookback_days: u32) -> DashboardResult<TriggeredRun> {
        let run = self.inner.trigger_run(lookback_days).await?;
        let removed = self.invalidate(&RUN_INVALIDATES).await;
        info!(run_id = %run.run_id, removed, "pipeline run triggered");
        Ok(run)
    }

    async fn generate_briefing(&self, request: &ReportRequest) -> DashboardResult<GeneratedReport> {
        let report = self.inner.generate_briefing(request).await?;
        self.invalidate(&REPORT_INVALIDATES).await;
        info!(report_id = %report.report_id, "briefing generated");
        Ok(report)
    }

    async fn generate_flash_alert(&self, event_id: &str) -> DashboardResult<GeneratedReport> {
        let report = self.inner.generate_flash_alert(event_id).await?;
        self.invalidate(&REPORT_INVALIDATES).await;
        info!(report_id = %report.report_id, event_id, "flash alert generated");
        Ok(report)
    }

    async fn generate_convergence_report(
        &self,
        request: &ReportRequest,
    ) -> DashboardResult<GeneratedReport> {
        let report = self.inner.generate_convergence_report(request).await?;
        self.invalidate(&REPORT_INVALIDATES).await;
        info!(report_id = %report.report_id, "convergence report generated");
        Ok(report)
    }

    async fn list_reports(&self) -> DashboardResult<Vec<Report>> {
        let inner = Arc::clone(&self.inner);
        self.caches
            .reports
            .get_or_fetch("reports", async move { inner.list_reports().await })
            .await
    }

    // Binary downloads are not cached.
    async fn download_report(&self, filename: &str) -> DashboardResult<Vec<u8>> {
        self.inner.download_report(filename).await
    }

    async fn invalidate(&self, keys: &[&str]) -> usize {
        self.caches.invalidate(keys).await
    }
}
