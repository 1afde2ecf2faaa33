//! Metrics collection and exposition.
//!
//! # Metrics
//! - `quizhub_requests_total` (counter): requests by method and status
//! - `quizhub_request_duration_seconds` (histogram): latency
//! - `quizhub_rate_limited_total` (counter): rejected requests by scope
//! - `quizhub_answers_checked_total` (counter): answer checks by result
//! - `quizhub_attempts_total` (counter): recorded quiz attempts

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [("method", method.to_string()), ("status", status.to_string())];
    metrics::counter!("quizhub_requests_total", &labels).increment(1);
    metrics::histogram!("quizhub_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(scope: &'static str) {
    metrics::counter!("quizhub_rate_limited_total", "scope" => scope).increment(1);
}

pub fn record_answer_checked(correct: bool) {
    let result = if correct { "correct" } else { "incorrect" };
    metrics::counter!("quizhub_answers_checked_total", "result" => result).increment(1);
}

pub fn record_attempt() {
    metrics::counter!("quizhub_attempts_total").increment(1);
}

/// Middleware recording every request.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
