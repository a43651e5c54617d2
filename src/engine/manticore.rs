// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Manticore Search connection over the MySQL wire protocol.
//!
//! Manticore (and Sphinx 2.x/3.x) accept SQL on a MySQL-compatible listener,
//! usually on port 9306. Statements are sent unprepared through
//! [`sqlx::raw_sql`] since the engine only partially implements server-side
//! prepared statements.
//!
//! ## Connection quirks
//!
//! sqlx normally issues `SET sql_mode=...`, `SET time_zone=...` and
//! `SET NAMES ...` on every new connection. Manticore rejects some of those,
//! so all three are disabled before connecting.
//!
//! ## Multi statements
//!
//! `execute_multi` joins the statements with `;` and sends them as one
//! script. The server answers with one result set per statement, in order,
//! on the same session, which is what `SHOW META` needs to describe the
//! preceding `SELECT`.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Either, Row, TypeInfo};
use std::str::FromStr;
use tracing::{debug, info};

use super::traits::{EngineConnection, EngineError, EngineValue, ResultRow, ResultSet};
use crate::config::IndexSyncConfig;
use crate::resilience::retry::{retry, RetryConfig};

pub struct ManticoreConnection {
    pool: MySqlPool,
}

impl ManticoreConnection {
    /// Connect with startup-mode retry (fails after a few seconds on a bad URL).
    pub async fn connect(config: &IndexSyncConfig) -> Result<Self, EngineError> {
        Self::connect_with_retry(config, &RetryConfig::startup()).await
    }

    pub async fn connect_with_retry(
        config: &IndexSyncConfig,
        retry_config: &RetryConfig,
    ) -> Result<Self, EngineError> {
        let options = MySqlConnectOptions::from_str(&config.engine_url)
            .map_err(|e| EngineError::Unavailable(format!("invalid engine url: {}", e)))?
            .pipes_as_concat(false)
            .no_engine_substitution(false)
            .timezone(None)
            .set_names(false);

        let pool = retry("engine_connect", retry_config, || async {
            MySqlPoolOptions::new()
                .max_connections(config.engine_max_connections)
                .acquire_timeout(config.engine_acquire_timeout())
                .connect_with(options.clone())
                .await
                .map_err(classify)
        })
        .await?;

        info!(
            max_connections = config.engine_max_connections,
            "Search engine connection pool ready"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool (already configured for the engine).
    #[must_use]
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl EngineConnection for ManticoreConnection {
    async fn execute(&self, statement: &str) -> Result<ResultSet, EngineError> {
        debug!(statement = %statement, "Engine execute");
        let rows = sqlx::raw_sql(statement)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        let rows = rows.iter().map(convert_row).collect::<Result<Vec<_>, _>>()?;
        Ok(ResultSet::from_rows(rows))
    }

    async fn execute_multi(&self, statements: &[String]) -> Result<Vec<ResultSet>, EngineError> {
        if statements.is_empty() {
            return Ok(Vec::new());
        }

        let script = statements.join("; ");
        debug!(statement = %script, "Engine execute_multi");

        let mut sets = Vec::with_capacity(statements.len());
        let mut current = Vec::new();
        let mut stream = sqlx::raw_sql(&script).fetch_many(&self.pool);

        // Each result set is terminated by a query-result marker
        while let Some(step) = stream.try_next().await.map_err(classify)? {
            match step {
                Either::Left(_done) => sets.push(ResultSet::from_rows(std::mem::take(&mut current))),
                Either::Right(row) => current.push(convert_row(&row)?),
            }
        }
        if !current.is_empty() {
            sets.push(ResultSet::from_rows(current));
        }

        if sets.len() != statements.len() {
            return Err(EngineError::Protocol(format!(
                "expected {} result sets, got {}",
                statements.len(),
                sets.len()
            )));
        }
        Ok(sets)
    }
}

/// Map a driver error onto the engine taxonomy.
fn classify(err: sqlx::Error) -> EngineError {
    match &err {
        sqlx::Error::Database(db) => {
            let message = db.message().to_string();
            // Manticore: "duplicate id '1'"
            if message.to_ascii_lowercase().contains("duplicate id") {
                EngineError::DuplicateKey(message)
            } else {
                EngineError::Rejected(message)
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Configuration(_) => EngineError::Unavailable(err.to_string()),
        _ => EngineError::Protocol(err.to_string()),
    }
}

fn convert_row(row: &MySqlRow) -> Result<ResultRow, EngineError> {
    let mut out = ResultRow::new();
    for column in row.columns() {
        let value = decode_cell(row, column.ordinal(), column.type_info().name()).map_err(|e| {
            EngineError::Protocol(format!("cannot decode column '{}': {}", column.name(), e))
        })?;
        out.push(column.name(), value);
    }
    Ok(out)
}

// Text protocol: every cell arrives as text, so unchecked decoding is safe
// and tolerates the engine's loose column type reporting.
fn decode_cell(row: &MySqlRow, index: usize, type_name: &str) -> Result<EngineValue, sqlx::Error> {
    let type_name = type_name.to_ascii_uppercase();

    let value = if type_name == "NULL" {
        None
    } else if type_name.contains("UNSIGNED") {
        row.try_get_unchecked::<Option<u64>, _>(index)?.map(EngineValue::UInt)
    } else if type_name.contains("INT") || type_name == "BOOLEAN" {
        row.try_get_unchecked::<Option<i64>, _>(index)?.map(EngineValue::Int)
    } else if type_name == "FLOAT" || type_name == "DOUBLE" {
        row.try_get_unchecked::<Option<f64>, _>(index)?.map(EngineValue::Float)
    } else {
        row.try_get_unchecked::<Option<String>, _>(index)?.map(EngineValue::Text)
    };

    Ok(value.unwrap_or(EngineValue::Null))
}
