use std::{sync::Arc, time::Duration};

use loadaware::{
    Allocatable,
    config::{AllocatableArgs, MetricsConfig},
    snapshot::Snapshot,
};
use shared::models::{Node, Pod, ResourceList};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub fn list(entries: &[(&str, &str)]) -> ResourceList {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.parse().unwrap()))
        .collect()
}

/// Adds a node with a single pod carrying `requests`.
pub fn add_loaded_node(
    snapshot: &Snapshot,
    name: &str,
    capacity: &[(&str, &str)],
    requests: &[(&str, &str)],
) {
    snapshot.add_node(Node::new(name, list(capacity)));
    let mut pod = Pod::with_requests(&format!("{name}-load"), list(requests));
    pod.spec.node_name = name.to_string();
    snapshot.add_pod(pod);
}

/// 4 cores / 8Gi node at half its requested capacity.
pub fn half_loaded_snapshot(name: &str) -> Arc<Snapshot> {
    let snapshot = Snapshot::new();
    add_loaded_node(
        &snapshot,
        name,
        &[("cpu", "4000m"), ("memory", "8Gi"), ("pods", "110")],
        &[("cpu", "2000m"), ("memory", "4Gi")],
    );
    snapshot
}

pub fn metrics_config(server_url: &str, timeout_ms: u64) -> MetricsConfig {
    MetricsConfig {
        server_url: server_url.to_string(),
        token: None,
        timeout: Duration::from_millis(timeout_ms),
    }
}

pub fn plugin(yaml: &str, metrics: &MetricsConfig, snapshot: Arc<Snapshot>) -> Allocatable {
    let args = AllocatableArgs::from_yaml(yaml).expect("valid plugin args");
    Allocatable::from_config(&args, metrics, snapshot).expect("plugin builds")
}

/// Serves a fixed usage sample for `node`.
pub async fn mount_usage(server: &MockServer, node: &str, cpu: &str, memory: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/apis/metrics.k8s.io/v1beta1/nodes/{node}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "NodeMetrics",
            "apiVersion": "metrics.k8s.io/v1beta1",
            "metadata": { "name": node },
            "timestamp": "2024-05-01T10:00:00Z",
            "window": "10s",
            "usage": { "cpu": cpu, "memory": memory }
        })))
        .mount(server)
        .await;
}
