//! Integration Tests against a real Manticore Search server
//!
//! Tests use testcontainers for portability - no external docker-compose required.
//!
//! # Running Tests
//! ```bash
//! # Run all integration tests (requires Docker)
//! cargo test --test integration -- --ignored
//!
//! # Run only happy-path tests
//! cargo test --test integration happy -- --ignored
//!
//! # Run only failure scenario tests
//! cargo test --test integration failure -- --ignored
//! ```
//!
//! # Test Organization
//! - `happy_*` - Normal operation: writes, ranked search, pagination, sync
//! - `failure_*` - Failure scenarios: duplicate ids, stale entries, dead engine

use std::sync::Arc;

use index_sync::{
    AttributeType, EngineConnection, FieldValue, IndexDescriptor, IndexError, IndexManager,
    IndexManagerRegistry, IndexSyncConfig, IndexSynchronizer, InMemoryRecordStore,
    ManticoreConnection, PropertyAccessor, Record, RetryConfig, StaleEntryPolicy,
};

use testcontainers::{clients::Cli, core::WaitFor, Container, GenericImage};

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Article {
    id: u64,
    title: String,
    status: String,
}

impl Article {
    fn new(id: u64, title: &str, status: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            status: status.to_string(),
        }
    }
}

impl Record for Article {
    fn primary_key(&self) -> u64 {
        self.id
    }

    fn resolve_property(name: &str) -> Option<PropertyAccessor<Self>> {
        let read: fn(&Self) -> FieldValue = match name {
            "title" => |a| a.title.as_str().into(),
            "status" => |a| a.status.as_str().into(),
            _ => return None,
        };
        Some(PropertyAccessor::new(name, read))
    }
}

// =============================================================================
// Container Helpers
// =============================================================================

/// Create a Manticore container listening for MySQL clients on 9306
fn manticore_container(docker: &Cli) -> Container<'_, GenericImage> {
    let image = GenericImage::new("manticoresearch/manticore", "6.3.6")
        .with_exposed_port(9306)
        .with_wait_for(WaitFor::message_on_stdout("accepting connections"));
    docker.run(image)
}

fn config_for(port: u16) -> IndexSyncConfig {
    IndexSyncConfig {
        engine_url: format!("mysql://127.0.0.1:{}", port),
        engine_max_connections: 2,
        ..Default::default()
    }
}

struct Fixture {
    connection: Arc<ManticoreConnection>,
    store: Arc<InMemoryRecordStore<Article>>,
    config: IndexSyncConfig,
}

impl Fixture {
    async fn start(port: u16) -> Self {
        let config = config_for(port);
        let connection = Arc::new(
            ManticoreConnection::connect(&config)
                .await
                .expect("engine should accept connections"),
        );
        connection
            .execute("CREATE TABLE articles (title text, status string)")
            .await
            .expect("create table");

        Self {
            connection,
            store: Arc::new(InMemoryRecordStore::new()),
            config,
        }
    }

    fn manager(&self) -> IndexManager<Article> {
        let descriptor = IndexDescriptor::<Article>::builder("articles")
            .field("title", "title")
            .attribute("status", "status", AttributeType::String)
            .build()
            .unwrap();
        IndexManager::from_config(descriptor, self.connection.clone(), self.store.clone(), &self.config)
    }

    /// Put records in the store and return them.
    fn seed(&self, records: &[Article]) -> Vec<Article> {
        for record in records {
            self.store.put(record.clone());
        }
        records.to_vec()
    }
}

// =============================================================================
// Happy Path Tests - Normal Operation
// =============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_insert_then_find() {
    let docker = Cli::default();
    let manticore = manticore_container(&docker);
    let fixture = Fixture::start(manticore.get_host_port_ipv4(9306)).await;
    let manager = fixture.manager();

    let records = fixture.seed(&[
        Article::new(1, "rust ownership explained", "published"),
        Article::new(2, "gardening for beginners", "draft"),
    ]);
    for record in &records {
        manager.insert(record).await.expect("insert");
    }

    let found = manager.find("ownership", 1, 10).await.expect("find");
    assert_eq!(found, vec![records[0].clone()]);

    let none = manager.find("volcano", 1, 10).await.expect("find");
    assert!(none.is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_ranked_pagination() {
    let docker = Cli::default();
    let manticore = manticore_container(&docker);
    let fixture = Fixture::start(manticore.get_host_port_ipv4(9306)).await;
    let manager = fixture.manager();

    let records: Vec<Article> = (1..=5)
        .map(|i| Article::new(i, &format!("rust chapter {}", i), "published"))
        .collect();
    fixture.seed(&records);
    manager.bulk_insert(&records).await.expect("bulk insert");

    let first = manager.find_paginated("rust", 1, 2).await.expect("page 1");
    assert_eq!(first.total_count, 5);
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total_pages(), 3);
    assert!(first.has_next_page());

    let last = manager.find_paginated("rust", 3, 2).await.expect("page 3");
    assert_eq!(last.items.len(), 1);
    assert!(!last.has_next_page());

    // Pages never overlap
    let second = manager.find_paginated("rust", 2, 2).await.expect("page 2");
    let mut seen: Vec<u64> = first
        .items
        .iter()
        .chain(&second.items)
        .chain(&last.items)
        .map(|a| a.id)
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_replace_overwrites_document() {
    let docker = Cli::default();
    let manticore = manticore_container(&docker);
    let fixture = Fixture::start(manticore.get_host_port_ipv4(9306)).await;
    let manager = fixture.manager();

    let original = fixture.seed(&[Article::new(1, "old headline", "draft")]);
    manager.insert(&original[0]).await.expect("insert");

    let updated = fixture.seed(&[Article::new(1, "fresh headline", "published")]);
    manager.replace(&updated[0]).await.expect("replace");

    assert!(manager.find("old", 1, 10).await.unwrap().is_empty());
    assert_eq!(manager.find("fresh", 1, 10).await.unwrap(), updated);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn happy_synchronizer_follows_store_events() {
    let docker = Cli::default();
    let manticore = manticore_container(&docker);
    let fixture = Fixture::start(manticore.get_host_port_ipv4(9306)).await;

    let mut registry = IndexManagerRegistry::new();
    registry.register(fixture.manager()).unwrap();
    let sync = IndexSynchronizer::from_config(Arc::new(registry), &fixture.config);
    let manager = sync.registry().manager::<Article>("articles").unwrap();

    let article = fixture.seed(&[Article::new(7, "async runtimes", "published")]).remove(0);
    assert_eq!(sync.on_persisted(&article).await.unwrap(), 1);
    assert_eq!(manager.find("runtimes", 1, 10).await.unwrap(), vec![article.clone()]);

    fixture.store.remove(article.id);
    assert_eq!(sync.on_removed(&article).await.unwrap(), 1);
    assert_eq!(manager.find_paginated("runtimes", 1, 10).await.unwrap().total_count, 0);
}

// =============================================================================
// Failure Scenario Tests
// =============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn failure_duplicate_insert() {
    let docker = Cli::default();
    let manticore = manticore_container(&docker);
    let fixture = Fixture::start(manticore.get_host_port_ipv4(9306)).await;
    let manager = fixture.manager();

    let article = Article::new(1, "first", "draft");
    manager.insert(&article).await.expect("first insert");

    let err = manager.insert(&article).await.unwrap_err();
    assert!(
        matches!(err, IndexError::DuplicateKey { ref index, id: Some(1), .. } if index == "articles"),
        "unexpected error: {:?}",
        err
    );

    // REPLACE is the way to overwrite
    manager.replace(&article).await.expect("replace");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn failure_stale_entries_are_skipped_or_rejected() {
    let docker = Cli::default();
    let manticore = manticore_container(&docker);
    let fixture = Fixture::start(manticore.get_host_port_ipv4(9306)).await;

    // Indexed but never stored: the store has no ground truth for id 2
    let kept = fixture.seed(&[Article::new(1, "stale check", "published")]);
    let manager = fixture.manager();
    manager
        .bulk_insert(&[kept[0].clone(), Article::new(2, "stale check ghost", "draft")])
        .await
        .unwrap();

    let page = manager.find_paginated("stale", 1, 10).await.unwrap();
    assert_eq!(page.items, kept);
    assert_eq!(page.total_count, 2);

    let strict = fixture.manager().with_stale_entry_policy(StaleEntryPolicy::Fail);
    assert!(matches!(
        strict.find("stale", 1, 10).await,
        Err(IndexError::Persistence { .. })
    ));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn failure_engine_gone() {
    let docker = Cli::default();
    let manticore = manticore_container(&docker);
    let port = manticore.get_host_port_ipv4(9306);
    let fixture = Fixture::start(port).await;
    let manager = fixture.manager();

    fixture.connection.close().await;

    let err = manager.find("anything", 1, 10).await.unwrap_err();
    assert!(err.is_unavailable(), "unexpected error: {:?}", err);

    drop(manticore);
    let result = ManticoreConnection::connect_with_retry(&config_for(port), &RetryConfig::none()).await;
    assert!(result.is_err());
}
