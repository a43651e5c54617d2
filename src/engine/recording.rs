// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Scripted in-memory engine connection.
//!
//! Records every statement it is handed and replays queued responses in FIFO
//! order. With nothing queued, every statement succeeds with an empty result
//! set. Useful for asserting generated SQL without a running engine.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use super::traits::{EngineConnection, EngineError, ResultSet};

#[derive(Default)]
pub struct RecordingConnection {
    round_trips: Mutex<Vec<Vec<String>>>,
    responses: Mutex<VecDeque<Result<Vec<ResultSet>, EngineError>>>,
}

impl RecordingConnection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result sets for the next round trip.
    pub fn respond_with(&self, sets: Vec<ResultSet>) {
        self.responses.lock().push_back(Ok(sets));
    }

    /// Queue a failure for the next round trip.
    pub fn fail_with(&self, error: EngineError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Every statement executed so far, flattened, in order.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.round_trips.lock().iter().flatten().cloned().collect()
    }

    /// Statements grouped by round trip.
    #[must_use]
    pub fn round_trips(&self) -> Vec<Vec<String>> {
        self.round_trips.lock().clone()
    }

    /// Number of round trips made against this connection.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.round_trips.lock().len()
    }

    fn next_response(&self, statements: usize) -> Result<Vec<ResultSet>, EngineError> {
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![ResultSet::empty(); statements]))
    }
}

#[async_trait]
impl EngineConnection for RecordingConnection {
    async fn execute(&self, statement: &str) -> Result<ResultSet, EngineError> {
        self.round_trips.lock().push(vec![statement.to_string()]);
        let mut sets = self.next_response(1)?;
        Ok(if sets.is_empty() { ResultSet::empty() } else { sets.remove(0) })
    }

    async fn execute_multi(&self, statements: &[String]) -> Result<Vec<ResultSet>, EngineError> {
        self.round_trips.lock().push(statements.to_vec());
        self.next_response(statements.len())
    }
}
