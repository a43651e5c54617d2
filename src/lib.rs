// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Index Sync
//!
//! Keeps a Manticore/Sphinx full-text index in step with an authoritative
//! record store, and answers ranked, paginated queries with fully hydrated
//! records.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   IndexManagerRegistry                      │
//! │  • index name → manager                                     │
//! │  • record type → [index names] (registration order)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    IndexManager<R>                          │
//! │  • INSERT / REPLACE / bulk / DELETE statements              │
//! │  • MATCH query + SHOW META in one round trip                │
//! │  • reconcile ranked ids with unordered store records        │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                               │
//!                 ▼                               ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │   EngineConnection            │ │   RecordStore<R>          │
//! │   (Manticore over MySQL wire) │ │   (ground truth by id)    │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use index_sync::{
//!     AttributeType, FieldValue, IndexDescriptor, IndexManager, IndexManagerRegistry,
//!     IndexSyncConfig, InMemoryRecordStore, ManticoreConnection, PropertyAccessor, Record,
//! };
//!
//! #[derive(Clone)]
//! struct Article { id: u64, title: String, status: String }
//!
//! impl Record for Article {
//!     fn primary_key(&self) -> u64 { self.id }
//!
//!     fn resolve_property(name: &str) -> Option<PropertyAccessor<Self>> {
//!         let read: fn(&Self) -> FieldValue = match name {
//!             "title" => |a| a.title.as_str().into(),
//!             "status" => |a| a.status.as_str().into(),
//!             _ => return None,
//!         };
//!         Some(PropertyAccessor::new(name, read))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = IndexSyncConfig::default();
//!     let connection = Arc::new(ManticoreConnection::connect(&config).await?);
//!     let store = Arc::new(InMemoryRecordStore::<Article>::new());
//!
//!     let descriptor = IndexDescriptor::<Article>::builder("articles")
//!         .field("title", "title")
//!         .attribute("status", "status", AttributeType::String)
//!         .build()?;
//!
//!     let mut registry = IndexManagerRegistry::new();
//!     registry.register(IndexManager::from_config(descriptor, connection, store.clone(), &config))?;
//!
//!     let article = Article { id: 1, title: "Ownership in Rust".into(), status: "published".into() };
//!     store.put(article.clone());
//!
//!     let articles = registry.manager::<Article>("articles")?;
//!     articles.insert(&article).await?;
//!
//!     let page = articles.find_paginated("ownership", 1, 10).await?;
//!     println!("{} of {} results", page.items.len(), page.total_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`index`]: descriptors, managers, the registry and the store→index synchronizer
//! - [`engine`]: search engine connections
//! - [`store`]: record stores used for hydration
//! - [`record`]: the [`Record`] trait and value types
//! - [`resilience`]: connection retry

pub mod config;
pub mod engine;
pub mod index;
pub mod metrics;
pub mod record;
pub mod resilience;
pub mod store;

pub use config::{IndexSyncConfig, StaleEntryPolicy};
pub use engine::{
    EngineConnection, EngineError, EngineValue, ManticoreConnection, RecordingConnection,
    ResultRow, ResultSet,
};
pub use index::{
    reconcile, IndexDescriptor, IndexError, IndexManager, IndexManagerRegistry,
    IndexSynchronizer, ManagedIndex, Page, Reconciled, WriteVerb,
};
pub use record::{AttributeType, FieldValue, PropertyAccessor, Record, RecordType};
pub use resilience::retry::RetryConfig;
pub use store::{InMemoryRecordStore, RecordStore, StoreError};
