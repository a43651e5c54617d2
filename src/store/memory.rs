// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;

use super::traits::{RecordStore, StoreError};
use crate::record::Record;

/// Record store backed by a concurrent map.
///
/// Lookups come back in map iteration order, not request order, just like a
/// SQL `WHERE id IN (...)` without `ORDER BY`.
pub struct InMemoryRecordStore<R> {
    data: DashMap<u64, R>,
}

impl<R: Record + Clone> InMemoryRecordStore<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Insert or overwrite by primary key.
    pub fn put(&self, record: R) {
        self.data.insert(record.primary_key(), record);
    }

    pub fn remove(&self, id: u64) -> Option<R> {
        self.data.remove(&id).map(|(_, record)| record)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<R> {
        self.data.get(&id).map(|r| r.value().clone())
    }

    /// Snapshot of every record, in no particular order.
    #[must_use]
    pub fn all(&self) -> Vec<R> {
        self.data.iter().map(|r| r.value().clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<R: Record + Clone> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record + Clone> FromIterator<R> for InMemoryRecordStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let store = Self::new();
        for record in iter {
            store.put(record);
        }
        store
    }
}

#[async_trait]
impl<R: Record + Clone> RecordStore<R> for InMemoryRecordStore<R> {
    async fn find_by_ids(&self, ids: &[u64]) -> Result<Vec<R>, StoreError> {
        let wanted: HashSet<u64> = ids.iter().copied().collect();
        Ok(self
            .data
            .iter()
            .filter(|entry| wanted.contains(entry.key()))
            .map(|entry| entry.value().clone())
            .collect())
    }
}
