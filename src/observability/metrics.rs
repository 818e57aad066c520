//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_cache_lookups_total` (counter): lookups by `result` (hit, miss)
//! - `proxy_origin_fetches_total` (counter): origin fetches by `outcome`
//! - `proxy_origin_fetch_duration_seconds` (histogram): origin round trip
//! - `proxy_cache_entries` (gauge): entries currently stored

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a cache lookup result.
pub fn record_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("proxy_cache_lookups_total", "result" => result).increment(1);
}

/// Record the outcome of an origin fetch started at `start`.
pub fn record_origin_fetch(outcome: &'static str, start: Instant) {
    counter!("proxy_origin_fetches_total", "outcome" => outcome).increment(1);
    histogram!("proxy_origin_fetch_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the current number of cache entries.
pub fn record_cache_size(entries: usize) {
    gauge!("proxy_cache_entries").set(entries as f64);
}
