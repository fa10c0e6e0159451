//! Prometheus metrics: HTTP traffic, in-flight gauge, auth event counters.

use std::sync::LazyLock;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

use crate::ApiState;

/// Initialize the Prometheus metrics exporter.
///
/// Installs a process-global recorder, so this must run exactly once.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new();

    // Histogram buckets for request duration (in seconds)
    let builder = builder.set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Records count, duration and in-flight gauge for every request.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    // Normalize the path to keep label cardinality bounded
    let normalized_path = normalize_path(&path);

    gauge!("http_requests_in_flight", "method" => method.clone(), "path" => normalized_path.clone())
        .increment(1.0);

    let response: Response = next.run(req).await;

    gauge!("http_requests_in_flight", "method" => method.clone(), "path" => normalized_path.clone())
        .decrement(1.0);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => normalized_path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => normalized_path,
        "status" => status
    )
    .record(duration);

    response
}

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("UUID regex is valid")
});
static NUMBER_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("number regex is valid"));

/// Normalize URL paths to reduce cardinality in metrics.
/// Replaces UUIDs and numeric IDs with placeholders.
fn normalize_path(path: &str) -> String {
    let normalized = UUID_SEGMENT.replace_all(path, ":id");
    NUMBER_SEGMENT.replace_all(&normalized, "/:id").to_string()
}

/// Prometheus text exposition, or 503 while no recorder is installed.
pub async fn metrics_handler(State(state): State<ApiState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics exporter not installed\n".to_string(),
        ),
    }
}

/// Counts signup/signin attempts by outcome.
pub fn record_auth_event(event_type: &str, success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!(
        "auth_events_total",
        "type" => event_type.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
