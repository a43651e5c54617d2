// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Record stores: the ground truth index managers hydrate results from.

pub mod memory;
pub mod traits;

pub use memory::InMemoryRecordStore;
pub use traits::{RecordStore, StoreError};
