//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lexcompass_requests_total` (counter): service requests by route, status
//! - `lexcompass_request_duration_seconds` (histogram): service latency by route
//! - `lexcompass_backend_health` (gauge): 1=reachable, 0=unreachable, per endpoint
//! - `lexcompass_failovers_total` (counter): client endpoint switches by target role
//! - `lexcompass_normalization_failures_total` (counter): by operation
//! - `lexcompass_generation_calls_total` (counter): by provider, outcome
//!
//! Recording is a no-op until a recorder is installed, so the client binary
//! and tests can call these freely.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("lexcompass_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    histogram!("lexcompass_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_health(endpoint: &str, healthy: bool) {
    gauge!("lexcompass_backend_health", "endpoint" => endpoint.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_failover(to_role: &'static str) {
    counter!("lexcompass_failovers_total", "to" => to_role).increment(1);
}

pub fn record_normalization_failure(operation: &'static str) {
    counter!("lexcompass_normalization_failures_total", "operation" => operation).increment(1);
}

pub fn record_generation_call(provider: &str, ok: bool) {
    counter!(
        "lexcompass_generation_calls_total",
        "provider" => provider.to_string(),
        "outcome" => if ok { "ok" } else { "error" }
    )
    .increment(1);
}
