//! Pipeline runs and the report archive.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One backend computation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: String,
    pub run_date: String,
    pub started_at: String,
    #[serde(default)]
    pub finished_at: Option<String>,
    pub status: String,
    #[serde(default)]
    pub events_ingested: u64,
    #[serde(default)]
    pub threshold_crossings: u64,
    #[serde(default)]
    pub convergence_nodes: u64,
    #[serde(default)]
    pub source_errors: Vec<String>,
}

/// `pipeline/status`: the latest run, or an explicit marker when none exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineStatus {
    Run(PipelineRun),
    NoRuns { status: String, message: String },
}

impl PipelineStatus {
    pub fn latest_run(&self) -> Option<&PipelineRun> {
        match self {
            Self::Run(run) => Some(run),
            Self::NoRuns { .. } => None,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            Self::Run(run) => &run.status,
            Self::NoRuns { status, .. } => status,
        }
    }
}

/// Response to a triggered computation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredRun {
    pub run_id: String,
    pub status: String,
    pub since: NaiveDate,
}

/// Report archive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub created_at: String,
    pub report_type: String,
    pub filename: String,
}

/// Response to a report generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub report_id: String,
    pub filename: String,
}

/// Body accepted by the report generation endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_status_no_runs() {
        let json = serde_json::json!({"status": "no_runs", "message": "No pipeline runs recorded"});
        let status: PipelineStatus = serde_json::from_value(json).unwrap();
        assert!(status.latest_run().is_none());
        assert_eq!(status.status(), "no_runs");
    }

    #[test]
    fn test_pipeline_status_with_run() {
        let json = serde_json::json!({
            "id": "run-1",
            "run_date": "2025-03-01",
            "started_at": "2025-03-01T06:00:00",
            "finished_at": null,
            "status": "running",
            "events_ingested": 0,
            "threshold_crossings": 0,
            "convergence_nodes": 0,
            "source_errors": []
        });
        let status: PipelineStatus = serde_json::from_value(json).unwrap();
        assert_eq!(status.latest_run().map(|r| r.id.as_str()), Some("run-1"));
    }

    #[test]
    fn test_report_request_omits_empty_fields() {
        let body = serde_json::to_value(ReportRequest {
            event_id: Some("evt-1".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"event_id": "evt-1"}));
    }
}
