use async_trait::async_trait;

use super::errors::DashboardResult;
use super::models::{
    ConvergenceMatrix, ConvergenceScore, Event, EventPage, FilterState, GeneratedReport, NetworkDetail,
    NetworkSummary, PipelineRun, PipelineStatus, Report, ReportRequest, ThresholdDefinition,
    ThresholdStatusEntry, TriggeredRun,
};

/// Query contract of the external analytical service.
///
/// Read operations return immutable snapshots. Action operations are
/// fire-and-forget from the dashboard's point of view; implementations that
/// cache reads are responsible for invalidating the affected keys.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// List events matching the filter facets
    async fn list_events(&self, filter: &FilterState) -> DashboardResult<EventPage>;

    /// Get a single event
    ///
    /// # Returns
    /// * `Err(DashboardError::NotFound)` when the id has no record
    async fn get_event(&self, id: &str) -> DashboardResult<Event>;

    async fn list_networks(&self) -> DashboardResult<Vec<NetworkSummary>>;

    async fn get_network(&self, network_id: u8) -> DashboardResult<NetworkDetail>;

    async fn convergence_matrix(&self) -> DashboardResult<ConvergenceMatrix>;

    /// Convergence scores stored by the latest run
    async fn convergence_scores(&self) -> DashboardResult<Vec<ConvergenceScore>>;

    async fn threshold_definitions(&self) -> DashboardResult<Vec<ThresholdDefinition>>;

    /// Active threshold crossings from the latest run
    async fn threshold_status(&self) -> DashboardResult<Vec<ThresholdStatusEntry>>;

    async fn pipeline_status(&self) -> DashboardResult<PipelineStatus>;

    async fn pipeline_history(&self) -> DashboardResult<Vec<PipelineRun>>;

    /// Trigger a backend computation run over the last `lookback_days`
    async fn trigger_run(&self, lookback_days: u32) -> DashboardResult<TriggeredRun>;

    async fn generate_briefing(&self, request: &ReportRequest) -> DashboardResult<GeneratedReport>;

    async fn generate_flash_alert(&self, event_id: &str) -> DashboardResult<GeneratedReport>;

    async fn generate_convergence_report(
        &self,
        request: &ReportRequest,
    ) -> DashboardResult<GeneratedReport>;

    async fn list_reports(&self) -> DashboardResult<Vec<Report>>;

    /// Raw bytes of an archived report
    async fn download_report(&self, filename: &str) -> DashboardResult<Vec<u8>>;

    /// Drop cached results for `keys` so the next read goes upstream.
    /// Returns how many entries were removed; uncached implementations
    /// have nothing to drop.
    async fn invalidate(&self, _keys: &[&str]) -> usize {
        0
    }
}
