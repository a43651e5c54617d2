// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Connection could not be established or was lost mid-statement
    #[error("Search engine unavailable: {0}")]
    Unavailable(String),
    /// Engine refused a write because the document id already exists
    #[error("Duplicate document id: {0}")]
    DuplicateKey(String),
    /// Engine parsed but refused the statement
    #[error("Statement rejected: {0}")]
    Rejected(String),
    /// Engine answered with something that could not be decoded
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Single cell value in a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl EngineValue {
    /// Interpret the cell as an unsigned integer.
    ///
    /// Engines answering over the text protocol frequently hand back numbers as
    /// strings (`SHOW META` does), so numeric text is accepted too.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            EngineValue::UInt(v) => Some(*v),
            EngineValue::Int(v) => u64::try_from(*v).ok(),
            EngineValue::Text(s) => s.trim().parse().ok(),
            EngineValue::Float(_) | EngineValue::Null => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EngineValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for EngineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineValue::Null => write!(f, "NULL"),
            EngineValue::Int(v) => write!(f, "{}", v),
            EngineValue::UInt(v) => write!(f, "{}", v),
            EngineValue::Float(v) => write!(f, "{}", v),
            EngineValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for EngineValue {
    fn from(value: &str) -> Self {
        EngineValue::Text(value.to_string())
    }
}

impl From<i64> for EngineValue {
    fn from(value: i64) -> Self {
        EngineValue::Int(value)
    }
}

impl From<u64> for EngineValue {
    fn from(value: u64) -> Self {
        EngineValue::UInt(value)
    }
}

/// One row: ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    columns: Vec<(String, EngineValue)>,
}

impl ResultRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<EngineValue>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<EngineValue>) {
        self.columns.push((column.into(), value.into()));
    }

    /// First column with this name (case-insensitive, engines differ on case).
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&EngineValue> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &EngineValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Tabular result of one statement. Write statements produce an empty set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<ResultRow>,
}

impl ResultSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_rows(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Executes textual statements against the search engine.
///
/// Implementations own timeouts, reconnects and any retry policy; callers
/// treat every error as final.
#[async_trait]
pub trait EngineConnection: Send + Sync {
    async fn execute(&self, statement: &str) -> Result<ResultSet, EngineError>;

    /// Run several statements in one round trip, returning one result set per
    /// statement in order.
    ///
    /// Statements must share a session so that `SHOW META` describes the
    /// query before it. Default implementation runs them one by one, which is
    /// only correct for single-session connections.
    async fn execute_multi(&self, statements: &[String]) -> Result<Vec<ResultSet>, EngineError> {
        let mut sets = Vec::with_capacity(statements.len());
        for statement in statements {
            sets.push(self.execute(statement).await?);
        }
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_is_case_insensitive() {
        let row = ResultRow::new()
            .with("Variable_name", "total_found")
            .with("Value", "10");

        assert_eq!(row.get("variable_name").and_then(EngineValue::as_str), Some("total_found"));
        assert_eq!(row.get("VALUE").and_then(EngineValue::as_u64), Some(10));
        assert!(row.get("missing").is_none());
        assert_eq!(row.columns().count(), 2);
    }

    #[test]
    fn test_as_u64_conversions() {
        assert_eq!(EngineValue::Int(5).as_u64(), Some(5));
        assert_eq!(EngineValue::Int(-1).as_u64(), None);
        assert_eq!(EngineValue::UInt(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(EngineValue::Text(" 42 ".into()).as_u64(), Some(42));
        assert_eq!(EngineValue::Text("abc".into()).as_u64(), None);
        assert_eq!(EngineValue::Float(1.0).as_u64(), None);
        assert_eq!(EngineValue::Null.as_u64(), None);
    }
}
