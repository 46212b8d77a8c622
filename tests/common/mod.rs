//! Common test utilities for integration tests
//!
//! Provides shared fixtures used across multiple integration test files.

use sqlx::SqlitePool;
use worklist::adapters::sqlite::{create_migrated_test_pool, SqliteDirectory};
use worklist::domain::models::{ContentType, DisplayMode, EntityRef};

/// In-memory database with every migration applied.
pub async fn test_pool() -> SqlitePool {
    create_migrated_test_pool()
        .await
        .expect("Failed to create migrated test pool")
}

/// Seed a small site: two users, one group, three resource terms, and the
/// `article`, `event` and `page` content types. `page` and `article` have both
/// displays, `event` only a form display.
#[allow(dead_code)]
pub async fn seed_site(pool: &SqlitePool) -> SqliteDirectory {
    let directory = SqliteDirectory::new(pool.clone());

    directory.register_principal(&EntityRef::user(1), "alice").await.unwrap();
    directory.register_principal(&EntityRef::user(2), "bob").await.unwrap();
    directory.register_principal(&EntityRef::group(1), "Editors").await.unwrap();

    for (id, name) in [(10, "Studio A"), (11, "Studio B"), (12, "Archive")] {
        directory.register_term(id, "resource_locations", name).await.unwrap();
    }

    for (id, label) in [("article", "Article"), ("event", "Event"), ("page", "Basic page")] {
        directory.register_content_type(&ContentType::new(id, label)).await.unwrap();
        directory.register_display(id, DisplayMode::Form).await.unwrap();
    }
    directory.register_display("page", DisplayMode::View).await.unwrap();
    directory.register_display("article", DisplayMode::View).await.unwrap();

    directory.register_content(1, "page", "Home").await.unwrap();
    directory.register_content(2, "article", "Launch news").await.unwrap();
    directory.register_content(3, "event", "Open day").await.unwrap();

    directory
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
