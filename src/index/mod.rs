// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search index core
//!
//! ```text
//! IndexManagerRegistry ──(name | record type)──→ IndexManager<R>
//!                                                   │
//!                                  IndexDescriptor<R> (fields, attributes)
//!                                                   │
//!                          ┌────────────────────────┴──────────────┐
//!                    EngineConnection                       RecordStore<R>
//!               (statements, ranked ids)                (hydration by id)
//! ```

mod descriptor;
mod error;
mod manager;
mod pagination;
mod reconcile;
mod registry;
pub mod statement;
mod sync;

#[cfg(test)]
mod test_support;

pub use descriptor::{AttributeField, IndexDescriptor, IndexDescriptorBuilder, SearchField, ID_COLUMN};
pub use error::{IndexError, Result};
pub use manager::{IndexManager, ManagedIndex};
pub use pagination::Page;
pub use reconcile::{reconcile, Reconciled};
pub use registry::IndexManagerRegistry;
pub use statement::WriteVerb;
pub use sync::IndexSynchronizer;
