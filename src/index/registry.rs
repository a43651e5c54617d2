// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index Manager Registry
//!
//! Resolves index managers by index name or by record type. Built once at
//! startup, then shared read-only (wrap it in an `Arc` and pass it around).
//!
//! ```text
//! by_index_name                    by_record_type
//!   "articles"     → manager A       Article → ["articles", "articles_fr"]
//!   "articles_fr"  → manager B       Author  → ["authors"]
//!   "authors"      → manager C
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::error::{IndexError, Result};
use super::manager::{IndexManager, ManagedIndex};
use crate::record::{Record, RecordType};

#[derive(Default)]
pub struct IndexManagerRegistry {
    by_index_name: HashMap<String, Arc<dyn ManagedIndex>>,
    by_record_type: HashMap<RecordType, Vec<String>>,
}

impl IndexManagerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a manager under its index name.
    ///
    /// Fails with [`IndexError::DuplicateIndex`] if the name is taken; the
    /// registry is left untouched in that case.
    pub fn register<M: ManagedIndex + 'static>(&mut self, manager: M) -> Result<()> {
        self.register_shared(Arc::new(manager))
    }

    pub fn register_shared(&mut self, manager: Arc<dyn ManagedIndex>) -> Result<()> {
        let name = manager.index_name().to_string();
        if self.by_index_name.contains_key(&name) {
            return Err(IndexError::DuplicateIndex(name));
        }

        let record_type = manager.record_type();
        info!(index = %name, record_type = %record_type, "Registered index manager");

        self.by_record_type
            .entry(record_type)
            .or_default()
            .push(name.clone());
        self.by_index_name.insert(name, manager);
        Ok(())
    }

    pub fn resolve_by_index_name(&self, name: &str) -> Result<Arc<dyn ManagedIndex>> {
        self.by_index_name
            .get(name)
            .cloned()
            .ok_or_else(|| IndexError::IndexNotFound(name.to_string()))
    }

    /// Record type covered by `name`.
    pub fn resolve_record_type_by_index_name(&self, name: &str) -> Result<RecordType> {
        self.by_record_type
            .iter()
            .find(|(_, names)| names.iter().any(|n| n == name))
            .map(|(record_type, _)| *record_type)
            .ok_or_else(|| IndexError::IndexNotFound(name.to_string()))
    }

    /// Every manager covering `record_type`, in registration order.
    #[must_use]
    pub fn resolve_managers_by_record_type(&self, record_type: RecordType) -> Vec<Arc<dyn ManagedIndex>> {
        self.by_record_type
            .get(&record_type)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| self.by_index_name.get(name).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Typed lookup by index name.
    ///
    /// [`IndexError::IndexNotFound`] if absent; [`IndexError::Configuration`]
    /// if the index covers a different record type.
    pub fn manager<R: Record>(&self, name: &str) -> Result<Arc<IndexManager<R>>> {
        let manager = self.resolve_by_index_name(name)?;
        let covered = manager.record_type();
        manager.into_any().downcast::<IndexManager<R>>().map_err(|_| {
            IndexError::Configuration(format!(
                "index '{}' covers {}, not {}",
                name,
                covered,
                RecordType::of::<R>()
            ))
        })
    }

    /// Typed managers covering `R`, in registration order.
    #[must_use]
    pub fn managers_for<R: Record>(&self) -> Vec<Arc<IndexManager<R>>> {
        self.resolve_managers_by_record_type(RecordType::of::<R>())
            .into_iter()
            .filter_map(|m| m.into_any().downcast::<IndexManager<R>>().ok())
            .collect()
    }

    /// Registered index names, sorted.
    #[must_use]
    pub fn index_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_index_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_index_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_index_name.is_empty()
    }
}

impl std::fmt::Debug for IndexManagerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManagerRegistry")
            .field("indexes", &self.index_names())
            .field("record_types", &self.by_record_type.keys().collect::<Vec<_>>())
            .finish()
    }
}
