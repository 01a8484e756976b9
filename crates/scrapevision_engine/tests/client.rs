use std::time::Duration;

use pretty_assertions::assert_eq;
use scrapevision_core::{
    CrawlMethod, JobParams, RemoteStatus, RequestFailure, SentimentLabel, StarLabel,
    SubmitRequest,
};
use scrapevision_engine::{ClientSettings, FailureKind, JobApi, ReqwestJobApi};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestJobApi {
    ReqwestJobApi::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client")
}

fn request() -> SubmitRequest {
    SubmitRequest {
        url: "https://example.com".to_string(),
        params: JobParams::crawl(CrawlMethod::Dfs, 3),
    }
}

#[tokio::test]
async fn submit_forwards_params_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyse"))
        .and(body_json(json!({
            "urls": ["https://example.com"],
            "method": "dfs",
            "depth": 3,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "J1"})))
        .expect(1)
        .mount(&server)
        .await;

    let job_id = api_for(&server).submit(&request()).await.expect("submit ok");
    assert_eq!(job_id, "J1");
}

#[tokio::test]
async fn submit_error_body_is_server_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyse"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid depth"})))
        .mount(&server)
        .await;

    let err = api_for(&server).submit(&request()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Server("Invalid depth".to_string()));
    assert_eq!(
        RequestFailure::from(err),
        RequestFailure::Server("Invalid depth".to_string())
    );
}

#[tokio::test]
async fn submit_without_job_id_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let err = api_for(&server).submit(&request()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
    assert!(matches!(RequestFailure::from(err), RequestFailure::Malformed(_)));
}

#[tokio::test]
async fn submit_to_unreachable_host_is_transport_failure() {
    let api = ReqwestJobApi::new(ClientSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(500),
        ..ClientSettings::default()
    })
    .expect("client");

    let err = api.submit(&request()).await.unwrap_err();
    assert!(matches!(RequestFailure::from(err), RequestFailure::Transport(_)));
}

#[tokio::test]
async fn status_parses_results_and_tolerates_bad_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/J1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "results": [
                {
                    "url": "http://a",
                    "star_label": "4 stars",
                    "sentiment_label": "positive",
                    "sentiment_score": 0.87,
                    "summary": "Good"
                },
                {
                    "url": "http://b",
                    "star_label": "lots",
                    "sentiment_score": null
                }
            ]
        })))
        .mount(&server)
        .await;

    let report = api_for(&server).status("J1").await.expect("status ok");
    assert_eq!(report.status, RemoteStatus::Completed);
    assert_eq!(report.error, None);
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].star(), Some(StarLabel::Four));
    assert_eq!(report.results[0].sentiment(), Some(SentimentLabel::Positive));
    assert_eq!(report.results[0].summary, "Good");
    assert_eq!(report.results[1].star(), None);
    assert_eq!(report.results[1].sentiment_score, 0.0);
}

#[tokio::test]
async fn status_error_field_is_reported_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/J2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "rate limited"})))
        .mount(&server)
        .await;

    let report = api_for(&server).status("J2").await.expect("status ok");
    assert_eq!(report.error.as_deref(), Some("rate limited"));
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn status_with_non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/J3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).status("J3").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn status_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({"status": "pending", "results": []})),
        )
        .mount(&server)
        .await;

    let api = ReqwestJobApi::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .expect("client");

    let err = api.status("slow").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_status_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let api = ReqwestJobApi::new(ClientSettings {
        base_url: server.uri(),
        max_response_bytes: 16,
        ..ClientSettings::default()
    })
    .expect("client");

    let err = api.status("big").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(64)
        }
    );
}

#[tokio::test]
async fn cancel_posts_to_cancel_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cancel/J4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).cancel("J4").await.expect("cancel ok");
}
