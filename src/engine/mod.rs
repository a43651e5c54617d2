// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search engine connections.
//!
//! - [`EngineConnection`]: the narrow statement-execution contract managers use
//! - [`ManticoreConnection`]: sqlx-backed connection to a Manticore/Sphinx SQL listener
//! - [`RecordingConnection`]: scripted in-memory connection for tests

pub mod manticore;
pub mod recording;
pub mod traits;

pub use manticore::ManticoreConnection;
pub use recording::RecordingConnection;
pub use traits::{EngineConnection, EngineError, EngineValue, ResultRow, ResultSet};
