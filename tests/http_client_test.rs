//! HTTP client behaviour against a mock analytical service.

mod common;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use common::{event_json, page_json};
use smae_dashboard::domain::models::{
    AlertLevel, ConvergenceClass, FilterState, MetabolicNetwork, ReportRequest,
};
use smae_dashboard::infrastructure::api::{ApiClientConfig, HttpDashboardApi};
use smae_dashboard::{DashboardApi, DashboardError};

fn client(server: &ServerGuard) -> HttpDashboardApi {
    HttpDashboardApi::with_config(ApiClientConfig {
        base_url: format!("{}/api/v1", server.url()),
        timeout_secs: 5,
        max_retries: 1,
        initial_backoff_ms: 10, // Fast retries for testing
        max_backoff_ms: 20,
    })
    .expect("Failed to create client")
}

#[tokio::test]
async fn test_list_events_decodes_page() {
    let mut server = Server::new_async().await;
    let body = page_json(&[
        event_json("evt-1", &[1, 4, 7], "CRITICAL"),
        event_json("evt-2", &[2], "WATCH"),
    ]);
    let mock = server
        .mock("GET", "/api/v1/events")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    let page = client(&server)
        .list_events(&FilterState::default())
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].convergence_index(), 3);
    assert_eq!(page.items[0].alert_level, AlertLevel::Critical);
    assert_eq!(page.items[0].coordinates, Some((-19.9, -43.9)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_filter_facets_sent_in_selection_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/events")
        .match_query(Matcher::Exact(
            "network=7&network=1&alert_level=SYSTEMIC&min_ci=2&limit=50&offset=0".into(),
        ))
        .with_status(200)
        .with_body(page_json(&[]).to_string())
        .expect(1)
        .create_async()
        .await;

    let mut filter = FilterState::default();
    filter.toggle_network(MetabolicNetwork::Ocean);
    filter.toggle_network(MetabolicNetwork::Carbon);
    filter.toggle_alert_level(AlertLevel::Systemic);
    filter.min_ci = 2;

    let page = client(&server).list_events(&filter).await.unwrap();
    assert!(page.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_read_retried_once_after_server_error() {
    let mut server = Server::new_async().await;

    let mock_error = server
        .mock("GET", "/api/v1/thresholds/status")
        .with_status(503)
        .with_body("upstream unavailable")
        .expect(1)
        .create_async()
        .await;

    let mock_success = server
        .mock("GET", "/api/v1/thresholds/status")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let result = client(&server).threshold_status().await;

    assert!(result.is_ok(), "Should succeed after one retry");
    mock_error.assert_async().await;
    mock_success.assert_async().await;
}

#[tokio::test]
async fn test_second_failure_surfaces_fetch_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/convergence/matrix")
        .with_status(502)
        .with_body("bad gateway")
        .expect(2) // Initial attempt plus a single retry
        .create_async()
        .await;

    let err = client(&server).convergence_matrix().await.unwrap_err();

    match err {
        DashboardError::FetchFailure { key, .. } => assert_eq!(key, "convergence/matrix"),
        other => panic!("expected FetchFailure, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/events/evt-404")
        .with_status(404)
        .with_body(r#"{"detail": "Event not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = client(&server).get_event("evt-404").await.unwrap_err();

    assert_eq!(err, DashboardError::not_found("Event", "evt-404"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/networks")
        .with_status(200)
        .with_body(r#"[{"network_id": "one"}]"#)
        .expect(1)
        .create_async()
        .await;

    let err = client(&server).list_networks().await.unwrap_err();

    assert!(matches!(err, DashboardError::Decode(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ragged_matrix_rejected() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/convergence/matrix")
        .with_status(200)
        .with_body(json!({"labels": ["I", "II"], "matrix": [[1, 2], [3]]}).to_string())
        .create_async()
        .await;

    let err = client(&server).convergence_matrix().await.unwrap_err();
    assert!(matches!(err, DashboardError::InvalidMatrix(_)));
}

#[tokio::test]
async fn test_pipeline_status_without_runs() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/pipeline/status")
        .with_status(200)
        .with_body(r#"{"status": "no_runs", "message": "No pipeline runs recorded"}"#)
        .create_async()
        .await;

    let status = client(&server).pipeline_status().await.unwrap();
    assert!(status.latest_run().is_none());
    assert_eq!(status.status(), "no_runs");
}

#[tokio::test]
async fn test_trigger_run_is_sent_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/pipeline/run")
        .match_query(Matcher::UrlEncoded("lookback_days".into(), "2".into()))
        .with_status(500)
        .with_body("boom")
        .expect(1) // Actions are never retried
        .create_async()
        .await;

    let err = client(&server).trigger_run(2).await.unwrap_err();
    assert!(matches!(err, DashboardError::FetchFailure { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_briefing_posts_window() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/reports/briefing")
        .match_body(Matcher::Json(json!({"since": "2025-03-01", "until": "2025-03-07"})))
        .with_status(200)
        .with_body(r#"{"report_id": "rep-9", "filename": "briefing_2025-03-07.pdf"}"#)
        .expect(1)
        .create_async()
        .await;

    let request = ReportRequest {
        since: chrono::NaiveDate::from_ymd_opt(2025, 3, 1),
        until: chrono::NaiveDate::from_ymd_opt(2025, 3, 7),
        event_id: None,
    };
    let report = client(&server).generate_briefing(&request).await.unwrap();

    assert_eq!(report.report_id, "rep-9");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_flash_alert_for_unknown_event() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/reports/flash-alert")
        .match_body(Matcher::PartialJson(json!({"event_id": "evt-404"})))
        .with_status(404)
        .with_body(r#"{"detail": "Event not found"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .generate_flash_alert("evt-404")
        .await
        .unwrap_err();
    assert_eq!(err, DashboardError::not_found("Event", "evt-404"));
}

#[tokio::test]
async fn test_download_returns_raw_bytes() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/reports/download/briefing.pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(b"%PDF-1.7".as_slice())
        .create_async()
        .await;

    let bytes = client(&server)
        .download_report("briefing.pdf")
        .await
        .unwrap();
    assert_eq!(bytes, b"%PDF-1.7");
}

#[tokio::test]
async fn test_event_id_is_percent_encoded_in_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/events/evt%2F1%3Fdraft")
        .with_status(200)
        .with_body(event_json("evt/1?draft", &[3], "ALERT").to_string())
        .expect(1)
        .create_async()
        .await;

    let event = client(&server).get_event("evt/1?draft").await.unwrap();

    assert_eq!(event.id, "evt/1?draft");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_convergence_scores_classified_locally() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/convergence")
        .with_status(200)
        .with_body(
            json!([
                {"event_id": "evt-1", "networks": [1, 4, 7, 8], "severity_weights": {}},
                {"event_id": "evt-2", "networks": [2], "severity_weights": {"2": 1.0}},
                {"event_id": "evt-3", "networks": [5, 6], "severity_weights": {"5": 1.5, "6": 1.5}}
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let scores = client(&server).convergence_scores().await.unwrap();

    assert_eq!(scores.len(), 3);
    assert_eq!(scores[0].classification(), ConvergenceClass::SystemicNode);
    assert_eq!(scores[0].recommended_alert_level(), AlertLevel::Systemic);
    assert_eq!(scores[1].classification(), ConvergenceClass::SingleNetwork);
    assert_eq!(scores[2].recommended_alert_level(), AlertLevel::Critical);
    mock.assert_async().await;
}
