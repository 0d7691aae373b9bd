//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): HTTP requests by method, status, directive
//! - `gateway_request_duration_seconds` (histogram): HTTP latency distribution
//! - `gateway_commands_total` (counter): executed commands by verb and outcome
//! - `gateway_messages_total` (counter): inbound messages by outcome

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, directive: &'static str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "directive" => directive
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_command(verb: &str, outcome: &'static str) {
    counter!(
        "gateway_commands_total",
        "verb" => verb.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_message(outcome: &'static str) {
    counter!("gateway_messages_total", "outcome" => outcome).increment(1);
}
