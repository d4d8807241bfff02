//! Common test utilities for integration tests
//!
//! Fixture builders for upstream payloads and a scripted in-memory
//! `DashboardApi` that counts the calls it receives.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use smae_dashboard::domain::models::{
    ConvergenceMatrix, ConvergenceScore, Event, EventPage, FilterState, GeneratedReport, NetworkDetail,
    NetworkSummary, PipelineRun, PipelineStatus, Report, ReportRequest, ThresholdDefinition,
    ThresholdStatusEntry, TriggeredRun,
};
use smae_dashboard::{DashboardApi, DashboardError, DashboardResult};

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Event payload as the analytical service sends it.
pub fn event_json(id: &str, networks: &[u8], alert_level: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Event {id}"),
        "summary": "Tailings dam expansion upstream of the river delta",
        "event_date": "2025-03-01",
        "detected_at": "2025-03-01T06:00:00",
        "country": "Brazil",
        "coordinates": [-19.9, -43.9],
        "networks": networks,
        "layers": ["flow", "externality"],
        "nodes": ["appropriation"],
        "coupling_patterns": [1],
        "sources": [{
            "organization": "Frontline Watch",
            "report_name": "Field bulletin 12",
            "tier": 1,
            "access_date": "2025-03-02",
            "provisional": true
        }],
        "alert_level": alert_level,
        "resistance_summary": "Community blockade of access road",
    })
}

pub fn event(id: &str, networks: &[u8], alert_level: &str) -> Event {
    serde_json::from_value(event_json(id, networks, alert_level)).unwrap()
}

pub fn page_json(events: &[Value]) -> Value {
    json!({
        "items": events,
        "total": events.len(),
        "limit": 50,
        "offset": 0,
    })
}

pub fn page(events: Vec<Event>) -> EventPage {
    EventPage {
        total: events.len() as u64,
        items: events,
        limit: 50,
        offset: 0,
    }
}

pub fn run(id: &str, status: &str) -> PipelineRun {
    PipelineRun {
        id: id.to_string(),
        run_date: "2025-03-01".to_string(),
        started_at: "2025-03-01T06:00:00".to_string(),
        finished_at: None,
        status: status.to_string(),
        events_ingested: 4,
        threshold_crossings: 1,
        convergence_nodes: 1,
        source_errors: vec![],
    }
}

/// In-memory API with per-endpoint call counters.
///
/// Reads sleep for `latency` before answering so concurrent callers overlap.
pub struct CountingApi {
    pub events: Mutex<EventPage>,
    pub latency: Duration,
    /// Delay before `pipeline_status` answers.
    pub status_latency: Duration,
    pub event_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub report_list_calls: AtomicUsize,
    pub matrix_calls: AtomicUsize,
    pub runs_triggered: AtomicUsize,
    /// Remaining event-list calls that fail before succeeding.
    pub failures_left: AtomicUsize,
}

impl CountingApi {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(page(events)),
            latency: Duration::from_millis(20),
            status_latency: Duration::ZERO,
            event_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            report_list_calls: AtomicUsize::new(0),
            matrix_calls: AtomicUsize::new(0),
            runs_triggered: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn set_events(&self, events: Vec<Event>) {
        *self.events.lock().unwrap() = page(events);
    }
}

#[async_trait]
impl DashboardApi for CountingApi {
    async fn list_events(&self, filter: &FilterState) -> DashboardResult<EventPage> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(DashboardError::FetchFailure {
                key: filter.query_key(),
                reason: "connection reset".to_string(),
            });
        }
        Ok(self.events.lock().unwrap().clone())
    }

    async fn get_event(&self, id: &str) -> DashboardResult<Event> {
        let page = self.events.lock().unwrap().clone();
        page.items
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| DashboardError::not_found("Event", id))
    }

    async fn list_networks(&self) -> DashboardResult<Vec<NetworkSummary>> {
        Ok(vec![])
    }

    async fn get_network(&self, network_id: u8) -> DashboardResult<NetworkDetail> {
        Err(DashboardError::not_found("Network", network_id.to_string()))
    }

    async fn convergence_matrix(&self) -> DashboardResult<ConvergenceMatrix> {
        self.matrix_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ConvergenceMatrix {
            labels: vec!["I".to_string(), "II".to_string()],
            matrix: vec![vec![3, 1], vec![1, 0]],
        })
    }

    async fn convergence_scores(&self) -> DashboardResult<Vec<ConvergenceScore>> {
        Ok(vec![])
    }

    async fn threshold_definitions(&self) -> DashboardResult<Vec<ThresholdDefinition>> {
        Ok(vec![])
    }

    async fn threshold_status(&self) -> DashboardResult<Vec<ThresholdStatusEntry>> {
        Ok(vec![])
    }

    async fn pipeline_status(&self) -> DashboardResult<PipelineStatus> {
        let n = self.status_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.status_latency).await;
        Ok(PipelineStatus::Run(run(&format!("run-{n}"), "completed")))
    }

    async fn pipeline_history(&self) -> DashboardResult<Vec<PipelineRun>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![run("run-0", "completed")])
    }

    async fn trigger_run(&self, _lookback_days: u32) -> DashboardResult<TriggeredRun> {
        self.runs_triggered.fetch_add(1, Ordering::SeqCst);
        Ok(TriggeredRun {
            run_id: "run-new".to_string(),
            status: "started".to_string(),
            since: chrono::NaiveDate::from_ymd_opt(2025, 2, 27).unwrap(),
        })
    }

    async fn generate_briefing(&self, _request: &ReportRequest) -> DashboardResult<GeneratedReport> {
        Ok(GeneratedReport {
            report_id: "rep-1".to_string(),
            filename: "briefing_2025-03-01.pdf".to_string(),
        })
    }

    async fn generate_flash_alert(&self, event_id: &str) -> DashboardResult<GeneratedReport> {
        Ok(GeneratedReport {
            report_id: "rep-2".to_string(),
            filename: format!("flash_{event_id}.pdf"),
        })
    }

    async fn generate_convergence_report(
        &self,
        _request: &ReportRequest,
    ) -> DashboardResult<GeneratedReport> {
        Ok(GeneratedReport {
            report_id: "rep-3".to_string(),
            filename: "convergence_2025-03-01.pdf".to_string(),
        })
    }

    async fn list_reports(&self) -> DashboardResult<Vec<Report>> {
        self.report_list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }

    async fn download_report(&self, filename: &str) -> DashboardResult<Vec<u8>> {
        Ok(filename.as_bytes().to_vec())
    }
}
