// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for index managers and the engine connection.
//!
//! # Example
//!
//! ```
//! use index_sync::{IndexSyncConfig, StaleEntryPolicy};
//!
//! // Defaults
//! let config = IndexSyncConfig::default();
//! assert_eq!(config.engine_url, "mysql://127.0.0.1:9306");
//! assert_eq!(config.stale_entries, StaleEntryPolicy::Warn);
//!
//! // From JSON, unspecified fields fall back to defaults
//! let config = IndexSyncConfig::from_json(r#"{"default_page_size": 50, "stale_entries": "fail"}"#).unwrap();
//! assert_eq!(config.default_page_size, 50);
//! assert_eq!(config.stale_entries, StaleEntryPolicy::Fail);
//! ```

use serde::Deserialize;
use std::time::Duration;

/// What to do when the engine ranks an id the record store no longer has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleEntryPolicy {
    /// Drop the position, log at debug level
    Skip,
    /// Drop the position, log a warning with the stale ids
    #[default]
    Warn,
    /// Abort the read with a persistence error
    Fail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSyncConfig {
    /// Engine SQL endpoint (Manticore listens for MySQL clients on 9306)
    #[serde(default = "default_engine_url")]
    pub engine_url: String,

    #[serde(default = "default_engine_max_connections")]
    pub engine_max_connections: u32,

    #[serde(default = "default_engine_acquire_timeout_ms")]
    pub engine_acquire_timeout_ms: u64,

    /// Page size used by callers that do not pass one explicitly
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default)]
    pub stale_entries: StaleEntryPolicy,

    /// Records per statement when rebuilding an index
    #[serde(default = "default_reindex_batch_size")]
    pub reindex_batch_size: usize,
}

fn default_engine_url() -> String { "mysql://127.0.0.1:9306".to_string() }
fn default_engine_max_connections() -> u32 { 10 }
fn default_engine_acquire_timeout_ms() -> u64 { 5000 }
fn default_page_size() -> u32 { 20 }
fn default_reindex_batch_size() -> usize { 500 }

impl Default for IndexSyncConfig {
    fn default() -> Self {
        Self {
            engine_url: default_engine_url(),
            engine_max_connections: default_engine_max_connections(),
            engine_acquire_timeout_ms: default_engine_acquire_timeout_ms(),
            default_page_size: default_page_size(),
            stale_entries: StaleEntryPolicy::default(),
            reindex_batch_size: default_reindex_batch_size(),
        }
    }
}

impl IndexSyncConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn engine_acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_acquire_timeout_ms)
    }
}
