// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation.
//!
//! Uses the `metrics` crate facade; the binary (or embedding service) picks
//! the exporter. With no recorder installed every call is a no-op.
//!
//! # Metric Naming Convention
//! - `stocknews_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `tier`: fast, durable, all
//! - `operation`: get, set, sweep
//! - `status`: hit, miss, error, ok

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Record a cache operation outcome
pub fn record_operation(tier: &str, operation: &str, status: &str) {
    counter!(
        "stocknews_cache_operations_total",
        "tier" => tier.to_string(),
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record cache operation latency
pub fn record_latency(tier: &str, operation: &str, duration: Duration) {
    histogram!(
        "stocknews_cache_operation_seconds",
        "tier" => tier.to_string(),
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a contained failure (the caller never sees it)
pub fn record_error(tier: &str, operation: &str, error_type: &str) {
    counter!(
        "stocknews_cache_errors_total",
        "tier" => tier.to_string(),
        "operation" => operation.to_string(),
        "error_type" => error_type.to_string()
    )
    .increment(1);
}

/// Set the physical fast-tier entry count
pub fn set_fast_tier_entries(count: usize) {
    gauge!("stocknews_cache_fast_tier_entries").set(count as f64);
}

/// Record entries reclaimed by a sweep
pub fn record_evictions(tier: &str, count: u64) {
    counter!(
        "stocknews_cache_evictions_total",
        "tier" => tier.to_string()
    )
    .increment(count);
}

/// Record an upstream news provider request
pub fn record_upstream_request(provider: &str, status: &str, duration: Duration) {
    counter!(
        "stocknews_upstream_requests_total",
        "provider" => provider.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "stocknews_upstream_request_seconds",
        "provider" => provider.to_string()
    )
    .record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    // No recorder is installed in tests; these must not panic.
    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_operation("fast", "get", "hit");
        record_latency("durable", "get", Duration::from_millis(3));
        record_error("durable", "set", "timeout");
        set_fast_tier_entries(12);
        record_evictions("fast", 4);
        record_upstream_request("alphavantage", "ok", Duration::from_millis(120));
    }
}
