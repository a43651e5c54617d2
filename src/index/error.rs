// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use thiserror::Error;

use crate::engine::EngineError;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Descriptor or record mapping is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Index '{0}' is already registered")]
    DuplicateIndex(String),

    #[error("No index manager found for index '{0}'")]
    IndexNotFound(String),

    #[error("Duplicate document id {} in index '{index}': {message}", display_id(.id))]
    DuplicateKey {
        index: String,
        id: Option<u64>,
        message: String,
    },

    #[error("Search engine unavailable for index '{index}': {message}")]
    SearchEngineUnavailable { index: String, message: String },

    /// Engine refused the statement (syntax, schema mismatch, row rejected)
    #[error("Index '{index}' rejected statement: {message}")]
    Rejected { index: String, message: String },

    #[error("Protocol error on index '{index}': {message}")]
    Protocol { index: String, message: String },

    #[error("Persistence error for {record_type} (index '{index}'): {message}")]
    Persistence {
        index: String,
        record_type: String,
        message: String,
    },

    #[error("Invalid pagination on index '{index}': page {page}, page size {page_size}")]
    InvalidPagination {
        index: String,
        page: u32,
        page_size: u32,
    },
}

fn display_id(id: &Option<u64>) -> String {
    id.map_or_else(|| "?".to_string(), |id| id.to_string())
}

impl IndexError {
    /// Translate an engine failure, attaching the index and what was running.
    ///
    /// `id` is the document id when a single record was being written.
    pub(crate) fn from_engine(index: &str, context: &str, id: Option<u64>, err: EngineError) -> Self {
        let index = index.to_string();
        match err {
            EngineError::Unavailable(message) => IndexError::SearchEngineUnavailable {
                index,
                message: format!("{}: {}", context, message),
            },
            EngineError::DuplicateKey(message) => IndexError::DuplicateKey { index, id, message },
            EngineError::Rejected(message) => IndexError::Rejected {
                index,
                message: format!("{}: {}", context, message),
            },
            EngineError::Protocol(message) => IndexError::Protocol {
                index,
                message: format!("{}: {}", context, message),
            },
        }
    }

    pub(crate) fn from_store(index: &str, record_type: &str, ids: &[u64], err: StoreError) -> Self {
        IndexError::Persistence {
            index: index.to_string(),
            record_type: record_type.to_string(),
            message: format!("lookup of {} id(s) failed: {}", ids.len(), err),
        }
    }

    /// Whether the failure came from a collaborator being unreachable.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, IndexError::SearchEngineUnavailable { .. })
    }
}
