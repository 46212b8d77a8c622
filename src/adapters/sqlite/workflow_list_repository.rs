//! SQLite implementation of the WorkflowListRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AssignmentSet, ResourceTagSet, SaveStatus, WorkflowList};
use crate::domain::ports::WorkflowListRepository;

use super::{parse_datetime, parse_json_or_default};

pub struct SqliteWorkflowListRepository {
    pool: SqlitePool,
}

impl SqliteWorkflowListRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert(&self, list: &WorkflowList, assigned: &str, tags: &str) -> DomainResult<()> {
        let created_at = list.created_at().unwrap_or_else(Utc::now);
        let changed_at = list.changed_at().unwrap_or(created_at);

        let result = sqlx::query(
            r#"INSERT INTO workflow_lists (id, label, description, assigned_entities, resource_tags, created_at, changed_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(list.id())
        .bind(list.label())
        .bind(list.description())
        .bind(assigned)
        .bind(tags)
        .bind(created_at.to_rfc3339())
        .bind(changed_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DomainError::DuplicateId(list.id().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, list: &WorkflowList, assigned: &str, tags: &str) -> DomainResult<()> {
        let changed_at = list.changed_at().unwrap_or_else(Utc::now);

        let result = sqlx::query(
            r#"UPDATE workflow_lists SET label = ?, description = ?, assigned_entities = ?, resource_tags = ?, changed_at = ?
               WHERE id = ?"#
        )
        .bind(list.label())
        .bind(list.description())
        .bind(assigned)
        .bind(tags)
        .bind(changed_at.to_rfc3339())
        .bind(list.id())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::WorkflowListNotFound(list.id().to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl WorkflowListRepository for SqliteWorkflowListRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<WorkflowList>> {
        let row: Option<WorkflowListRow> = sqlx::query_as(
            "SELECT * FROM workflow_lists WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn save(&self, list: &mut WorkflowList) -> DomainResult<SaveStatus> {
        // Stamp a copy so a failed write leaves the caller's record untouched.
        let is_new = list.is_new();
        let mut stamped = list.clone();
        stamped.on_before_persist(is_new, Utc::now());

        let assigned = serde_json::to_string(stamped.assignments())?;
        let tags = serde_json::to_string(stamped.tags())?;

        let status = if is_new {
            self.insert(&stamped, &assigned, &tags).await?;
            SaveStatus::Created
        } else {
            self.update(&stamped, &assigned, &tags).await?;
            SaveStatus::Updated
        };

        stamped.mark_clean();
        *list = stamped;
        Ok(status)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM workflow_lists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::WorkflowListNotFound(id.to_string()));
        }

        Ok(())
    }

    async fn list_all(&self) -> DomainResult<Vec<WorkflowList>> {
        let rows: Vec<WorkflowListRow> = sqlx::query_as(
            "SELECT * FROM workflow_lists ORDER BY label COLLATE NOCASE, id"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn exists(&self, id: &str) -> DomainResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM workflow_lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[derive(sqlx::FromRow)]
struct WorkflowListRow {
    id: String,
    label: String,
    description: String,
    assigned_entities: Option<String>,
    resource_tags: Option<String>,
    created_at: String,
    changed_at: String,
}

impl TryFrom<WorkflowListRow> for WorkflowList {
    type Error = DomainError;

    fn try_from(row: WorkflowListRow) -> Result<Self, Self::Error> {
        let assignments: AssignmentSet = parse_json_or_default(row.assigned_entities)?;
        let tags: ResourceTagSet = parse_json_or_default(row.resource_tags)?;

        Ok(WorkflowList::restore(
            row.id,
            row.label,
            row.description,
            assignments,
            tags,
            parse_datetime(&row.created_at)?,
            parse_datetime(&row.changed_at)?,
        ))
    }
}
