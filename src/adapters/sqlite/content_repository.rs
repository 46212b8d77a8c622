//! SQLite implementation of the ContentRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ContentItem;
use crate::domain::ports::ContentRepository;

use super::{from_sql_id, to_sql_id};

pub struct SqliteContentRepository {
    pool: SqlitePool,
}

impl SqliteContentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Content items currently pointing at a workflow list.
    pub async fn list_by_workflow(&self, workflow_id: &str) -> DomainResult<Vec<ContentItem>> {
        let rows: Vec<ContentItemRow> = sqlx::query_as(
            "SELECT id, content_type, title, workflow_id FROM content_items WHERE workflow_id = ? ORDER BY id"
        )
        .bind(workflow_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}

#[async_trait]
impl ContentRepository for SqliteContentRepository {
    async fn get(&self, id: u64) -> DomainResult<Option<ContentItem>> {
        let row: Option<ContentItemRow> = sqlx::query_as(
            "SELECT id, content_type, title, workflow_id FROM content_items WHERE id = ?"
        )
        .bind(to_sql_id(id)?)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn set_workflow(&self, id: u64, workflow_id: Option<&str>) -> DomainResult<()> {
        let result = sqlx::query("UPDATE content_items SET workflow_id = ? WHERE id = ?")
            .bind(workflow_id)
            .bind(to_sql_id(id)?)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ContentNotFound(id));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ContentItemRow {
    id: i64,
    content_type: String,
    title: String,
    workflow_id: Option<String>,
}

impl TryFrom<ContentItemRow> for ContentItem {
    type Error = DomainError;

    fn try_from(row: ContentItemRow) -> Result<Self, Self::Error> {
        Ok(ContentItem {
            id: from_sql_id(row.id)?,
            content_type: row.content_type,
            title: row.title,
            workflow_id: row.workflow_id,
        })
    }
}
