// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Store → index propagation.
//!
//! Hook [`IndexSynchronizer`] into whatever persists records and every index
//! covering the record type follows along:
//!
//! | store event | index statement |
//! |-------------|-----------------|
//! | persisted   | `INSERT`        |
//! | updated     | `REPLACE`       |
//! | removed     | `DELETE`        |
//!
//! Indexes are written one after another in registration order and the first
//! failure is returned. Earlier indexes keep their write; callers that need
//! all-or-nothing must reindex on failure.

use std::sync::Arc;
use tracing::debug;

use super::error::Result;
use super::registry::IndexManagerRegistry;
use crate::config::IndexSyncConfig;
use crate::record::Record;

pub struct IndexSynchronizer {
    registry: Arc<IndexManagerRegistry>,
    batch_size: usize,
}

impl IndexSynchronizer {
    #[must_use]
    pub fn new(registry: Arc<IndexManagerRegistry>) -> Self {
        Self::from_config(registry, &IndexSyncConfig::default())
    }

    #[must_use]
    pub fn from_config(registry: Arc<IndexManagerRegistry>, config: &IndexSyncConfig) -> Self {
        Self {
            registry,
            batch_size: config.reindex_batch_size.max(1),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &IndexManagerRegistry {
        &self.registry
    }

    /// Insert a newly persisted record. Returns the number of indexes written.
    pub async fn on_persisted<R: Record>(&self, record: &R) -> Result<usize> {
        let managers = self.registry.managers_for::<R>();
        for manager in &managers {
            manager.insert(record).await?;
        }
        debug!(id = record.primary_key(), indexes = managers.len(), "Indexed persisted record");
        Ok(managers.len())
    }

    /// Overwrite the indexed copy of an updated record.
    pub async fn on_updated<R: Record>(&self, record: &R) -> Result<usize> {
        let managers = self.registry.managers_for::<R>();
        for manager in &managers {
            manager.replace(record).await?;
        }
        debug!(id = record.primary_key(), indexes = managers.len(), "Reindexed updated record");
        Ok(managers.len())
    }

    /// Drop a removed record from every covering index.
    pub async fn on_removed<R: Record>(&self, record: &R) -> Result<usize> {
        let managers = self.registry.managers_for::<R>();
        let id = record.primary_key();
        for manager in &managers {
            manager.delete(&[id]).await?;
        }
        debug!(id, indexes = managers.len(), "Removed record from indexes");
        Ok(managers.len())
    }

    /// Write `records` to every covering index with batched `REPLACE`s.
    ///
    /// Returns the number of statements executed.
    pub async fn reindex<R: Record>(&self, records: &[R]) -> Result<usize> {
        let managers = self.registry.managers_for::<R>();
        let mut statements = 0;
        for manager in &managers {
            for chunk in records.chunks(self.batch_size) {
                manager.bulk_replace(chunk).await?;
                statements += 1;
            }
            debug!(index = %manager.index_name(), records = records.len(), "Reindexed");
        }
        Ok(statements)
    }
}
