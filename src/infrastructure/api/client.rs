//! HTTP implementation of the analytical service contract

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::error::ApiError;
use super::retry::RetryPolicy;
use crate::domain::errors::{DashboardError, DashboardResult};
use crate::domain::models::{
    encode_component, query_key, Config, ConvergenceMatrix, ConvergenceScore, Event, EventPage, FilterState, GeneratedReport,
    NetworkDetail, NetworkSummary, PipelineRun, PipelineStatus, Report, ReportRequest,
    ThresholdDefinition, ThresholdStatusEntry, TriggeredRun,
};
use crate::domain::ports::DashboardApi;

/// Connection settings for [`HttpDashboardApi`]
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL including the API prefix, e.g. `http://localhost:8000/api/v1`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retries after a transient read failure
    pub max_retries: u32,

    pub initial_backoff_ms: u64,

    pub max_backoff_ms: u64,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ApiClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            timeout_secs: config.api.timeout_secs,
            max_retries: config.fetch.max_retries,
            initial_backoff_ms: config.fetch.initial_backoff_ms,
            max_backoff_ms: config.fetch.max_backoff_ms,
        }
    }
}

/// reqwest client for the analytical service
///
/// Reads go through the retry policy. Actions (run trigger, report
/// generation) are sent exactly once.
pub struct HttpDashboardApi {
    http_client: ReqwestClient,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl HttpDashboardApi {
    /// Create a client with custom configuration
    ///
    /// # Returns
    /// * `Err(anyhow::Error)` - Failed to build HTTP client
    pub fn with_config(config: ApiClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_policy: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        Err(ApiError::from_status(status, body))
    }

    async fn send_get<T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .http_client
            .get(self.url(path))
            .query(pairs)
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET `path` with retry; errors are mapped against `entity` and `id`.
    async fn read<T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(&str, String)],
        entity: &'static str,
        id: &str,
    ) -> DashboardResult<T> {
        debug!(path, "GET");
        self.retry_policy
            .execute(|| self.send_get(path, pairs))
            .await
            .map_err(|err| err.into_dashboard(entity, &query_key(path, pairs), id))
    }

    async fn send_post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let mut request = self.http_client.post(self.url(path)).query(pairs);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST without retry.
    async fn act<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(&str, String)],
        body: Option<&B>,
        entity: &'static str,
        id: &str,
    ) -> DashboardResult<T> {
        debug!(path, "POST");
        self.send_post(path, pairs, body)
            .await
            .map_err(|err| err.into_dashboard(entity, &query_key(path, pairs), id))
    }

    async fn send_download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http_client.get(self.url(path)).send().await?;
        Ok(Self::check(response).await?.bytes().await?.to_vec())
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    #[instrument(skip(self, filter))]
    async fn list_events(&self, filter: &FilterState) -> DashboardResult<EventPage> {
        self.read("events", &filter.query_pairs(), "Events", "events")
            .await
    }

    #[instrument(skip(self))]
    async fn get_event(&self, id: &str) -> DashboardResult<Event> {
        self.read(&format!("events/{}", encode_component(id)), &[], "Event", id)
            .await
    }

    async fn list_networks(&self) -> DashboardResult<Vec<NetworkSummary>> {
        self.read("networks", &[], "Networks", "networks").await
    }

    #[instrument(skip(self))]
    async fn get_network(&self, network_id: u8) -> DashboardResult<NetworkDetail> {
        let id = network_id.to_string();
        self.read(&format!("networks/{id}"), &[], "Network", &id)
            .await
    }

    async fn convergence_matrix(&self) -> DashboardResult<ConvergenceMatrix> {
        let matrix: ConvergenceMatrix = self
            .read("convergence/matrix", &[], "ConvergenceMatrix", "matrix")
            .await?;
        matrix.validate()?;
        Ok(matrix)
    }

    async fn convergence_scores(&self) -> DashboardResult<Vec<ConvergenceScore>> {
        self.read("convergence", &[], "ConvergenceScores", "scores")
            .await
    }

    async fn threshold_definitions(&self) -> DashboardResult<Vec<ThresholdDefinition>> {
        self.read("thresholds", &[], "Thresholds", "thresholds")
            .await
    }

    async fn threshold_status(&self) -> DashboardResult<Vec<ThresholdStatusEntry>> {
        self.read("thresholds/status", &[], "ThresholdStatus", "status")
            .await
    }

    async fn pipeline_status(&self) -> DashboardResult<PipelineStatus> {
        self.read("pipeline/status", &[], "PipelineStatus", "status")
            .await
    }

    async fn pipeline_history(&self) -> DashboardResult<Vec<PipelineRun>> {
        self.read("pipeline/history", &[], "PipelineHistory", "history")
            .await
    }

    #[instrument(skip(self))]
    async fn trigger_run(&self, lookback_days: u32) -> DashboardResult<TriggeredRun> {
        let pairs = [("lookback_days", lookback_days.to_string())];
        self.act::<(), _>("pipeline/run", &pairs, None, "PipelineRun", "run")
            .await
    }

    async fn generate_briefing(&self, request: &ReportRequest) -> DashboardResult<GeneratedReport> {
        self.act("reports/briefing", &[], Some(request), "Report", "briefing")
            .await
    }

    #[instrument(skip(self))]
    async fn generate_flash_alert(&self, event_id: &str) -> DashboardResult<GeneratedReport> {
        let request = ReportRequest {
            event_id: Some(event_id.to_string()),
            ..ReportRequest::default()
        };
        self.act("reports/flash-alert", &[], Some(&request), "Event", event_id)
            .await
    }

    async fn generate_convergence_report(
        &self,
        request: &ReportRequest,
    ) -> DashboardResult<GeneratedReport> {
        self.act(
            "reports/convergence",
            &[],
            Some(request),
            "Report",
            "convergence",
        )
        .await
    }

    async fn list_reports(&self) -> DashboardResult<Vec<Report>> {
        self.read("reports", &[], "Reports", "reports").await
    }

    #[instrument(skip(self))]
    async fn download_report(&self, filename: &str) -> DashboardResult<Vec<u8>> {
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return Err(DashboardError::InvalidRequest(format!(
                "invalid report filename: {filename}"
            )));
        }
        let path = format!("reports/download/{filename}");
        self.retry_policy
            .execute(|| self.send_download(&path))
            .await
            .map_err(|err| err.into_dashboard("Report", &path, filename))
    }
}
