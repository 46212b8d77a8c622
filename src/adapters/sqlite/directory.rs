//! SQLite-backed directory of principals, taxonomy terms, content types and
//! content items.
//!
//! Stands in for the host's user/group and taxonomy storage. The resolver
//! side is read-only; the `register_*` methods seed the directory.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ContentType, DisplayMode, EntityRef};
use crate::domain::ports::{EntityResolver, ResolvedEntity};

use super::to_sql_id;

pub struct SqliteDirectory {
    pool: SqlitePool,
}

impl SqliteDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or relabel a principal.
    pub async fn register_principal(&self, entity: &EntityRef, label: &str) -> DomainResult<()> {
        if label.trim().is_empty() {
            return Err(DomainError::ValidationFailed("principal label cannot be empty".to_string()));
        }

        sqlx::query(
            r#"INSERT INTO principals (kind, id, label) VALUES (?, ?, ?)
               ON CONFLICT(kind, id) DO UPDATE SET label = excluded.label"#
        )
        .bind(entity.kind.as_str())
        .bind(to_sql_id(entity.id)?)
        .bind(label)
        .execute(&self.pool)
        .await?;

        debug!(entity = %entity, "Registered principal");
        Ok(())
    }

    /// Insert or rename a term in a vocabulary.
    pub async fn register_term(&self, id: u64, vocabulary: &str, name: &str) -> DomainResult<()> {
        if id == 0 {
            return Err(DomainError::ValidationFailed("term id must be positive".to_string()));
        }

        sqlx::query(
            r#"INSERT INTO terms (id, vocabulary, name) VALUES (?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET vocabulary = excluded.vocabulary, name = excluded.name"#
        )
        .bind(to_sql_id(id)?)
        .bind(vocabulary)
        .bind(name)
        .execute(&self.pool)
        .await?;

        debug!(term_id = id, vocabulary, "Registered term");
        Ok(())
    }

    pub async fn register_content_type(&self, content_type: &ContentType) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO content_types (id, label) VALUES (?, ?)
               ON CONFLICT(id) DO UPDATE SET label = excluded.label"#
        )
        .bind(&content_type.id)
        .bind(&content_type.label)
        .execute(&self.pool)
        .await?;

        debug!(content_type = %content_type.id, "Registered content type");
        Ok(())
    }

    /// Create a content item of an existing content type, with no workflow.
    pub async fn register_content(&self, id: u64, content_type: &str, title: &str) -> DomainResult<()> {
        if id == 0 {
            return Err(DomainError::ValidationFailed("content id must be positive".to_string()));
        }

        let result = sqlx::query("INSERT INTO content_items (id, content_type, title) VALUES (?, ?, ?)")
            .bind(to_sql_id(id)?)
            .bind(content_type)
            .bind(title)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                DomainError::ValidationFailed(format!("content item {id} already exists")),
            ),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => Err(
                DomainError::ValidationFailed(format!("unknown content type '{content_type}'")),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Create an (empty) display object for a content type.
    pub async fn register_display(&self, content_type: &str, mode: DisplayMode) -> DomainResult<()> {
        let result = sqlx::query("INSERT OR IGNORE INTO entity_displays (content_type, mode) VALUES (?, ?)")
            .bind(content_type)
            .bind(mode.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => Err(
                DomainError::ValidationFailed(format!("unknown content type '{content_type}'")),
            ),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl EntityResolver for SqliteDirectory {
    async fn resolve(&self, entity: &EntityRef) -> DomainResult<Option<ResolvedEntity>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT label FROM principals WHERE kind = ? AND id = ?")
            .bind(entity.kind.as_str())
            .bind(to_sql_id(entity.id)?)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(label,)| ResolvedEntity { label }))
    }

    async fn resolve_tag(&self, vocabulary: &str, tag_id: u64) -> DomainResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT name FROM terms WHERE vocabulary = ? AND id = ?")
            .bind(vocabulary)
            .bind(to_sql_id(tag_id)?)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(name,)| name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_directory() -> SqliteDirectory {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteDirectory::new(pool)
    }

    #[tokio::test]
    async fn test_resolve_principals_by_kind() {
        let dir = setup_directory().await;
        dir.register_principal(&EntityRef::user(3), "alice").await.unwrap();
        dir.register_principal(&EntityRef::group(3), "Editors").await.unwrap();

        let user = dir.resolve(&EntityRef::user(3)).await.unwrap().unwrap();
        assert_eq!(user.label, "alice");
        let group = dir.resolve(&EntityRef::group(3)).await.unwrap().unwrap();
        assert_eq!(group.label, "Editors");
        assert!(dir.resolve(&EntityRef::user(4)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_principal_relabels() {
        let dir = setup_directory().await;
        dir.register_principal(&EntityRef::user(1), "old").await.unwrap();
        dir.register_principal(&EntityRef::user(1), "new").await.unwrap();
        let user = dir.resolve(&EntityRef::user(1)).await.unwrap().unwrap();
        assert_eq!(user.label, "new");
    }

    #[tokio::test]
    async fn test_resolve_tag_scoped_to_vocabulary() {
        let dir = setup_directory().await;
        dir.register_term(7, "resource_locations", "Main hall").await.unwrap();

        assert_eq!(
            dir.resolve_tag("resource_locations", 7).await.unwrap().as_deref(),
            Some("Main hall")
        );
        assert!(dir.resolve_tag("tags", 7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_content_requires_known_type() {
        let dir = setup_directory().await;
        let err = dir.register_content(1, "page", "Home").await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));

        dir.register_content_type(&ContentType::new("page", "Basic page")).await.unwrap();
        dir.register_content(1, "page", "Home").await.unwrap();

        let err = dir.register_content(1, "page", "Again").await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }
}
