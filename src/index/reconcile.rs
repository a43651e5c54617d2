// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Rank reconciliation.
//!
//! The engine returns ids ordered by relevance; the store returns the
//! matching records in whatever order it likes. [`reconcile`] puts the
//! records back into rank order without touching any I/O.

use std::collections::HashMap;

use crate::record::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<R> {
    /// Records in rank order, no gaps
    pub records: Vec<R>,
    /// Ranked ids the store had no record for, in rank order
    pub missing: Vec<u64>,
}

/// Order `records` to follow `ranked_ids`.
///
/// Records whose id is not ranked are dropped; ranked ids with no record are
/// reported in `missing`. If the same id is ranked twice, only the first
/// position receives the record.
pub fn reconcile<R: Record>(ranked_ids: &[u64], records: Vec<R>) -> Reconciled<R> {
    let mut by_id: HashMap<u64, R> = records
        .into_iter()
        .map(|record| (record.primary_key(), record))
        .collect();

    let mut ordered = Vec::with_capacity(ranked_ids.len().min(by_id.len()));
    let mut missing = Vec::new();

    for id in ranked_ids {
        match by_id.remove(id) {
            Some(record) => ordered.push(record),
            None => missing.push(*id),
        }
    }

    Reconciled {
        records: ordered,
        missing,
    }
}
