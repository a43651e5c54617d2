// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for index managers.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host process is responsible for installing an exporter.
//!
//! # Metric Naming Convention
//! - `index_sync_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `index`: index name
//! - `kind`: insert, replace, bulk_insert, bulk_replace, delete, truncate, find
//! - `status`: success, error

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record one statement (or multi-statement round trip) against the engine
pub fn record_statement(index: &str, kind: &str, success: bool) {
    counter!(
        "index_sync_statements_total",
        "index" => index.to_string(),
        "kind" => kind.to_string(),
        "status" => if success { "success" } else { "error" }
    )
    .increment(1);
}

/// Record rows written by a write statement
pub fn record_rows_written(index: &str, rows: usize) {
    counter!("index_sync_rows_written_total", "index" => index.to_string()).increment(rows as u64);
}

/// Record end-to-end read latency (engine + store + reconciliation)
pub fn record_query_latency(index: &str, duration: Duration) {
    histogram!("index_sync_query_seconds", "index" => index.to_string())
        .record(duration.as_secs_f64());
}

/// Record hydrated results returned to the caller
pub fn record_query_results(index: &str, count: usize) {
    histogram!("index_sync_query_results", "index" => index.to_string()).record(count as f64);
}

/// Record ranked ids with no record in the store
pub fn record_stale_entries(index: &str, count: usize) {
    counter!("index_sync_stale_entries_total", "index" => index.to_string())
        .increment(count as u64);
}

/// Times a block and reports to the query latency histogram on drop.
pub struct LatencyTimer {
    index: String,
    start: Instant,
}

impl LatencyTimer {
    #[must_use]
    pub fn new(index: &str) -> Self {
        Self {
            index: index.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_query_latency(&self.index, self.start.elapsed());
    }
}
