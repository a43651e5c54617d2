// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use thiserror::Error;

use crate::record::Record;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Authoritative source of records, looked up by primary key.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Fetch every record whose primary key is in `ids`.
    ///
    /// Order of the result is unspecified and ids with no record are simply
    /// absent from it.
    async fn find_by_ids(&self, ids: &[u64]) -> Result<Vec<R>, StoreError>;
}
