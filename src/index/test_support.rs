// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Fixtures shared by the index unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::engine::{EngineValue, ResultRow, ResultSet};
use crate::record::{FieldValue, PropertyAccessor, Record};
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleEntity {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub rank: i64,
    pub score: f64,
    pub active: bool,
    pub tags: Vec<i64>,
    pub note: Option<String>,
}

impl SimpleEntity {
    pub fn new(id: u64, name: &str, status: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            status: status.to_string(),
            rank: 0,
            score: 0.0,
            active: false,
            tags: Vec::new(),
            note: None,
        }
    }
}

impl Record for SimpleEntity {
    fn primary_key(&self) -> u64 {
        self.id
    }

    fn resolve_property(name: &str) -> Option<PropertyAccessor<Self>> {
        let read: fn(&Self) -> FieldValue = match name {
            "name" => |e| e.name.as_str().into(),
            "status" => |e| e.status.as_str().into(),
            "rank" => |e| e.rank.into(),
            "score" => |e| e.score.into(),
            "active" => |e| e.active.into(),
            "tags" => |e| e.tags.clone().into(),
            "note" => |e| e.note.clone().into(),
            _ => return None,
        };
        Some(PropertyAccessor::new(name, read))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OtherEntity {
    pub id: u64,
    pub title: String,
}

impl Record for OtherEntity {
    fn primary_key(&self) -> u64 {
        self.id
    }

    fn resolve_property(name: &str) -> Option<PropertyAccessor<Self>> {
        match name {
            "title" => Some(PropertyAccessor::new(name, |e: &OtherEntity| e.title.as_str().into())),
            _ => None,
        }
    }
}

/// Store that answers with a fixed record list in the order given,
/// regardless of what was asked, and remembers the requested ids.
pub struct FixedStore<R> {
    records: Vec<R>,
    failure: Option<StoreError>,
    pub requests: Mutex<Vec<Vec<u64>>>,
}

impl<R> FixedStore<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(error),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<R: Record + Clone> RecordStore<R> for FixedStore<R> {
    async fn find_by_ids(&self, ids: &[u64]) -> Result<Vec<R>, StoreError> {
        self.requests.lock().push(ids.to_vec());
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.records.clone()),
        }
    }
}

/// Result set shaped like `SELECT id, WEIGHT() AS w ...`.
pub fn ranked_ids(ids: &[u64]) -> ResultSet {
    ResultSet::from_rows(
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                ResultRow::new()
                    .with("id", *id)
                    .with("w", EngineValue::Int(1000 - i as i64))
            })
            .collect(),
    )
}

/// Result set shaped like `SHOW META`.
pub fn meta(total_found: u64) -> ResultSet {
    ResultSet::from_rows(vec![
        ResultRow::new().with("Variable_name", "total").with("Value", total_found.min(1000).to_string().as_str()),
        ResultRow::new().with("Variable_name", "total_found").with("Value", total_found.to_string().as_str()),
        ResultRow::new().with("Variable_name", "time").with("Value", "0.001"),
    ])
}
