//! Scoring with the metrics server in the loop
//!
//! - live usage reorders nodes with identical requests
//! - unreachable, failing or slow servers degrade to request estimates
//! - a zero CPU sample is ignored in favor of requests
//! - cancelling the cycle aborts a pending query

use std::time::Duration;

use loadaware::{NodeScore, ScoreError, snapshot::Snapshot};
use shared::models::Pod;
use tokio_util::sync::CancellationToken;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

use crate::common::{add_loaded_node, half_loaded_snapshot, metrics_config, mount_usage, plugin};

const LIVE_LEAST: &str = r#"
mode: Least
metricsEnabled: true
resources:
- name: cpu
  weight: 1000000
- name: memory
  weight: 1
"#;

#[tokio::test]
async fn live_usage_reorders_nodes() {
    let server = MockServer::start().await;
    mount_usage(&server, "hot", "3500m", "6Gi").await;
    mount_usage(&server, "cool", "500000000n", "1048576Ki").await;

    let snapshot = Snapshot::new();
    for name in ["hot", "cool"] {
        add_loaded_node(
            &snapshot,
            name,
            &[("cpu", "4"), ("memory", "8Gi")],
            &[("cpu", "2"), ("memory", "4Gi")],
        );
    }

    let plugin = plugin(LIVE_LEAST, &metrics_config(&server.uri(), 500), snapshot);
    let names = vec!["hot".to_string(), "cool".to_string()];
    let ranked = plugin
        .score_nodes(&CancellationToken::new(), &Pod::default(), &names)
        .await;
    assert_eq!(
        ranked,
        vec![
            NodeScore { name: "cool".into(), score: 87 },
            NodeScore { name: "hot".into(), score: 21 },
        ]
    );
}

#[tokio::test]
async fn unreachable_server_falls_back_to_requests() {
    let plugin = plugin(
        LIVE_LEAST,
        &metrics_config("http://127.0.0.1:1", 500),
        half_loaded_snapshot("n1"),
    );
    let score = plugin
        .score(&CancellationToken::new(), &Pod::default(), "n1")
        .await;
    assert_eq!(score, Ok(50));
}

#[tokio::test]
async fn server_error_falls_back_to_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let plugin = plugin(LIVE_LEAST, &metrics_config(&server.uri(), 500), half_loaded_snapshot("n1"));
    let score = plugin
        .score(&CancellationToken::new(), &Pod::default(), "n1")
        .await;
    assert_eq!(score, Ok(50));
}

#[tokio::test]
async fn zero_cpu_sample_uses_requested_cpu() {
    let server = MockServer::start().await;
    mount_usage(&server, "n1", "0", "2Gi").await;

    let plugin = plugin(LIVE_LEAST, &metrics_config(&server.uri(), 500), half_loaded_snapshot("n1"));
    // cpu from requests (2000m), memory from the sample (2Gi)
    let score = plugin
        .score(&CancellationToken::new(), &Pod::default(), "n1")
        .await;
    assert_eq!(score, Ok(67));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let plugin = plugin(LIVE_LEAST, &metrics_config(&server.uri(), 100), half_loaded_snapshot("n1"));
    let score = plugin
        .score(&CancellationToken::new(), &Pod::default(), "n1")
        .await;
    assert_eq!(score, Ok(50));
}

#[tokio::test]
async fn cancelled_cycle_stops_scoring() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let plugin = plugin(LIVE_LEAST, &metrics_config(&server.uri(), 5000), half_loaded_snapshot("n1"));
    let ctx = CancellationToken::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let score = plugin.score(&ctx, &Pod::default(), "n1").await;
    assert_eq!(score, Err(ScoreError::Cancelled("n1".to_string())));
}
