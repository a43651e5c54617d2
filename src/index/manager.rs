// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index Manager
//!
//! Binds one [`IndexDescriptor`] to an engine connection and a record store.
//!
//! # Read path
//!
//! ```text
//! find(query, page, size)
//!       │
//!       ├─→ engine: SELECT id, WEIGHT() ... ; SHOW META     (one round trip)
//!       │        │
//!       │        └─→ ranked ids [7, 2, 9]   + total_found
//!       │
//!       ├─→ store: find_by_ids([7, 2, 9])                   (any order)
//!       │        │
//!       │        └─→ {2, 7}
//!       │
//!       └─→ reconcile → [7, 2]   (9 is stale: skipped, warned or fatal)
//! ```
//!
//! Nothing is retried here. Engine and store failures are translated into
//! [`IndexError`] with the index name and query attached, then returned.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, warn};

use super::descriptor::IndexDescriptor;
use super::error::{IndexError, Result};
use super::pagination::Page;
use super::reconcile::reconcile;
use super::statement::{
    delete_statement, match_statement, truncate_statement, write_statement, WriteVerb,
    META_NAME_COLUMN, META_STATEMENT, META_VALUE_COLUMN, TOTAL_FOUND,
};
use crate::config::{IndexSyncConfig, StaleEntryPolicy};
use crate::engine::{EngineConnection, ResultSet};
use crate::metrics;
use crate::record::{Record, RecordType};
use crate::store::RecordStore;

pub struct IndexManager<R: Record> {
    descriptor: Arc<IndexDescriptor<R>>,
    connection: Arc<dyn EngineConnection>,
    store: Arc<dyn RecordStore<R>>,
    stale_entries: StaleEntryPolicy,
    default_page_size: u32,
}

impl<R: Record> IndexManager<R> {
    pub fn new(
        descriptor: IndexDescriptor<R>,
        connection: Arc<dyn EngineConnection>,
        store: Arc<dyn RecordStore<R>>,
    ) -> Self {
        Self::from_config(descriptor, connection, store, &IndexSyncConfig::default())
    }

    pub fn from_config(
        descriptor: IndexDescriptor<R>,
        connection: Arc<dyn EngineConnection>,
        store: Arc<dyn RecordStore<R>>,
        config: &IndexSyncConfig,
    ) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            connection,
            store,
            stale_entries: config.stale_entries,
            default_page_size: config.default_page_size,
        }
    }

    #[must_use]
    pub fn with_stale_entry_policy(mut self, policy: StaleEntryPolicy) -> Self {
        self.stale_entries = policy;
        self
    }

    #[must_use]
    pub fn descriptor(&self) -> &IndexDescriptor<R> {
        &self.descriptor
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        self.descriptor.name()
    }

    #[must_use]
    pub fn stale_entry_policy(&self) -> StaleEntryPolicy {
        self.stale_entries
    }

    #[must_use]
    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub fn is_indexable(&self, record: &dyn Any) -> bool {
        self.descriptor.is_indexable(record)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Writes
    // ═══════════════════════════════════════════════════════════════════════

    /// Add one document. Fails with [`IndexError::DuplicateKey`] if the id is taken.
    pub async fn insert(&self, record: &R) -> Result<()> {
        let statement = self.write_statement(WriteVerb::Insert, std::slice::from_ref(record))?;
        self.execute_write("insert", &statement, Some(record.primary_key()), 1).await
    }

    /// Add or overwrite one document.
    pub async fn replace(&self, record: &R) -> Result<()> {
        let statement = self.write_statement(WriteVerb::Replace, std::slice::from_ref(record))?;
        self.execute_write("replace", &statement, Some(record.primary_key()), 1).await
    }

    /// Insert every record in a single statement. Empty input is a no-op.
    ///
    /// The engine accepts or rejects the statement as a whole.
    pub async fn bulk_insert(&self, records: &[R]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let statement = self.write_statement(WriteVerb::Insert, records)?;
        self.execute_write("bulk_insert", &statement, None, records.len()).await
    }

    /// Replace every record in a single statement. Empty input is a no-op.
    pub async fn bulk_replace(&self, records: &[R]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let statement = self.write_statement(WriteVerb::Replace, records)?;
        self.execute_write("bulk_replace", &statement, None, records.len()).await
    }

    /// Remove documents by id. Empty input is a no-op.
    pub async fn delete(&self, ids: &[u64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let statement = delete_statement(self.index_name(), ids);
        let id = if ids.len() == 1 { Some(ids[0]) } else { None };
        self.execute_write("delete", &statement, id, ids.len()).await
    }

    /// Remove every document from the index.
    pub async fn truncate(&self) -> Result<()> {
        let statement = truncate_statement(self.index_name());
        self.execute_write("truncate", &statement, None, 0).await
    }

    /// Render the write statement for `records` without executing it.
    pub fn write_statement(&self, verb: WriteVerb, records: &[R]) -> Result<String> {
        let tuples = records
            .iter()
            .map(|record| self.descriptor.value_tuple(record))
            .collect::<Result<Vec<_>>>()?;
        Ok(write_statement(verb, self.index_name(), &self.descriptor.columns(), &tuples))
    }

    async fn execute_write(&self, kind: &str, statement: &str, id: Option<u64>, rows: usize) -> Result<()> {
        let index = self.index_name();
        debug!(index = %index, kind, statement = %statement, "Executing write");

        match self.connection.execute(statement).await {
            Ok(_) => {
                metrics::record_statement(index, kind, true);
                metrics::record_rows_written(index, rows);
                Ok(())
            }
            Err(e) => {
                metrics::record_statement(index, kind, false);
                Err(IndexError::from_engine(index, kind, id, e))
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Reads
    // ═══════════════════════════════════════════════════════════════════════

    /// Records matching `query`, most relevant first.
    ///
    /// `page` is 1-based. The result may be shorter than `page_size` when
    /// the index references records the store no longer has.
    #[tracing::instrument(skip(self), fields(index = %self.index_name()))]
    pub async fn find(&self, query: &str, page: u32, page_size: u32) -> Result<Vec<R>> {
        let (records, _meta) = self.search(query, page, page_size).await?;
        Ok(records)
    }

    /// Like [`find`](Self::find), wrapped with the engine's total match count.
    #[tracing::instrument(skip(self), fields(index = %self.index_name()))]
    pub async fn find_paginated(&self, query: &str, page: u32, page_size: u32) -> Result<Page<R>> {
        let (items, meta) = self.search(query, page, page_size).await?;
        let meta = meta.ok_or_else(|| self.protocol_error(query, "metadata result set missing"))?;
        let total_count = self.total_found(query, &meta)?;

        Ok(Page {
            items,
            total_count,
            current_page: page,
            page_size,
        })
    }

    /// [`find_paginated`](Self::find_paginated) with the configured default page size.
    pub async fn find_page(&self, query: &str, page: u32) -> Result<Page<R>> {
        self.find_paginated(query, page, self.default_page_size).await
    }

    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<(Vec<R>, Option<ResultSet>)> {
        let index = self.index_name();
        if page == 0 || page_size == 0 {
            return Err(IndexError::InvalidPagination {
                index: index.to_string(),
                page,
                page_size,
            });
        }

        let _timer = metrics::LatencyTimer::new(index);
        let offset = u64::from(page - 1) * u64::from(page_size);
        let statements = vec![
            match_statement(index, &self.descriptor.field_names(), query, offset, page_size),
            META_STATEMENT.to_string(),
        ];
        debug!(index = %index, statement = %statements[0], "Executing match");

        let sets = match self.connection.execute_multi(&statements).await {
            Ok(sets) => {
                metrics::record_statement(index, "find", true);
                sets
            }
            Err(e) => {
                metrics::record_statement(index, "find", false);
                return Err(IndexError::from_engine(index, &format!("query '{}'", query), None, e));
            }
        };

        let mut sets = sets.into_iter();
        let hits = sets
            .next()
            .ok_or_else(|| self.protocol_error(query, "match result set missing"))?;
        let meta = sets.next();

        let ranked = self.ranked_ids(query, &hits)?;
        if ranked.is_empty() {
            metrics::record_query_results(index, 0);
            return Ok((Vec::new(), meta));
        }

        let record_type = self.descriptor.record_type();
        let fetched = self
            .store
            .find_by_ids(&ranked)
            .await
            .map_err(|e| IndexError::from_store(index, record_type.name(), &ranked, e))?;

        let reconciled = reconcile(&ranked, fetched);
        if !reconciled.missing.is_empty() {
            self.handle_stale(query, &reconciled.missing)?;
        }

        metrics::record_query_results(index, reconciled.records.len());
        Ok((reconciled.records, meta))
    }

    fn ranked_ids(&self, query: &str, hits: &ResultSet) -> Result<Vec<u64>> {
        hits.rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                row.get("id").and_then(|v| v.as_u64()).ok_or_else(|| {
                    self.protocol_error(query, &format!("row {} has no usable id column", position))
                })
            })
            .collect()
    }

    fn total_found(&self, query: &str, meta: &ResultSet) -> Result<u64> {
        let row = meta
            .rows
            .iter()
            .find(|row| {
                row.get(META_NAME_COLUMN)
                    .and_then(|v| v.as_str())
                    .is_some_and(|name| name == TOTAL_FOUND)
            })
            .ok_or_else(|| self.protocol_error(query, "metadata has no total_found row"))?;

        row.get(META_VALUE_COLUMN)
            .and_then(|v| v.as_u64())
            .ok_or_else(|| self.protocol_error(query, "total_found is not an integer"))
    }

    fn handle_stale(&self, query: &str, missing: &[u64]) -> Result<()> {
        let index = self.index_name();
        metrics::record_stale_entries(index, missing.len());

        match self.stale_entries {
            StaleEntryPolicy::Skip => {
                debug!(index = %index, stale_ids = ?missing, "Skipping stale index entries");
                Ok(())
            }
            StaleEntryPolicy::Warn => {
                warn!(index = %index, query = %query, stale_ids = ?missing, "Index entries have no matching record");
                Ok(())
            }
            StaleEntryPolicy::Fail => Err(IndexError::Persistence {
                index: index.to_string(),
                record_type: self.descriptor.record_type().name().to_string(),
                message: format!(
                    "no record for ranked id {} ({} stale) in query '{}'",
                    missing[0],
                    missing.len(),
                    query
                ),
            }),
        }
    }

    fn protocol_error(&self, query: &str, message: &str) -> IndexError {
        IndexError::Protocol {
            index: self.index_name().to_string(),
            message: format!("query '{}': {}", query, message),
        }
    }
}

/// Type-erased view of an [`IndexManager`], as held by the registry.
#[async_trait]
pub trait ManagedIndex: Send + Sync {
    fn index_name(&self) -> &str;

    fn record_type(&self) -> RecordType;

    fn is_indexable(&self, record: &dyn Any) -> bool;

    fn field_names(&self) -> Vec<&str>;

    fn attribute_names(&self) -> Vec<&str>;

    async fn delete(&self, ids: &[u64]) -> Result<()>;

    async fn truncate(&self) -> Result<()>;

    /// For downcasting back to `IndexManager<R>`.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

#[async_trait]
impl<R: Record> ManagedIndex for IndexManager<R> {
    fn index_name(&self) -> &str {
        self.descriptor.name()
    }

    fn record_type(&self) -> RecordType {
        self.descriptor.record_type()
    }

    fn is_indexable(&self, record: &dyn Any) -> bool {
        self.descriptor.is_indexable(record)
    }

    fn field_names(&self) -> Vec<&str> {
        self.descriptor.field_names()
    }

    fn attribute_names(&self) -> Vec<&str> {
        self.descriptor.attribute_names()
    }

    async fn delete(&self, ids: &[u64]) -> Result<()> {
        IndexManager::<R>::delete(self, ids).await
    }

    async fn truncate(&self) -> Result<()> {
        IndexManager::<R>::truncate(self).await
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
