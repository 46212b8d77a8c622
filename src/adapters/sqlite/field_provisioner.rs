//! SQLite implementation of the FieldProvisioner port.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ContentType, DisplayComponent, DisplayMode, FieldDefaults, FieldStorageSpec};
use crate::domain::ports::FieldProvisioner;

pub struct SqliteFieldProvisioner {
    pool: SqlitePool,
}

impl SqliteFieldProvisioner {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The component a field has on a display, if any.
    pub async fn display_component(
        &self,
        content_type: &str,
        mode: DisplayMode,
        field_name: &str,
    ) -> DomainResult<Option<DisplayComponent>> {
        let row: Option<DisplayComponentRow> = sqlx::query_as(
            r#"SELECT component_type, weight, label_display FROM display_components
               WHERE content_type = ? AND mode = ? AND field_name = ?"#
        )
        .bind(content_type)
        .bind(mode.as_str())
        .bind(field_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Whether the shared storage definition exists.
    pub async fn storage_exists(&self, field_name: &str) -> DomainResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM field_storages WHERE field_name = ?")
            .bind(field_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl FieldProvisioner for SqliteFieldProvisioner {
    async fn ensure_storage(&self, spec: &FieldStorageSpec) -> DomainResult<bool> {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO field_storages (field_name, entity_type, target_type, cardinality)
               VALUES (?, ?, ?, ?)"#
        )
        .bind(&spec.field_name)
        .bind(&spec.entity_type)
        .bind(&spec.target_type)
        .bind(spec.cardinality)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::provision(&spec.field_name, e))?;

        let created = result.rows_affected() > 0;
        if created {
            debug!(field = %spec.field_name, "Created field storage");
        }
        Ok(created)
    }

    async fn content_types(&self) -> DomainResult<Vec<ContentType>> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, label FROM content_types ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(id, label)| ContentType { id, label }).collect())
    }

    async fn list_attached(&self, field_name: &str) -> DomainResult<BTreeSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT content_type FROM field_attachments WHERE field_name = ?")
            .bind(field_name)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(ct,)| ct).collect())
    }

    async fn attach(&self, field_name: &str, content_type: &str, defaults: &FieldDefaults) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO field_attachments (field_name, content_type, label, description, required)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(field_name, content_type) DO UPDATE SET
                   label = excluded.label, description = excluded.description, required = excluded.required"#
        )
        .bind(field_name)
        .bind(content_type)
        .bind(&defaults.label)
        .bind(&defaults.description)
        .bind(defaults.required)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::provision(content_type, e))?;

        debug!(field = field_name, content_type, "Attached field");
        Ok(())
    }

    async fn detach(&self, field_name: &str, content_type: &str) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM display_components WHERE content_type = ? AND field_name = ?")
            .bind(content_type)
            .bind(field_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::provision(content_type, e))?;

        let result = sqlx::query("DELETE FROM field_attachments WHERE field_name = ? AND content_type = ?")
            .bind(field_name)
            .bind(content_type)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::provision(content_type, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FieldNotAttached {
                field_name: field_name.to_string(),
                content_type: content_type.to_string(),
            });
        }

        tx.commit().await?;
        debug!(field = field_name, content_type, "Detached field");
        Ok(())
    }

    async fn display_exists(&self, content_type: &str, mode: DisplayMode) -> DomainResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM entity_displays WHERE content_type = ? AND mode = ?")
            .bind(content_type)
            .bind(mode.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn set_display_component(
        &self,
        content_type: &str,
        mode: DisplayMode,
        field_name: &str,
        component: &DisplayComponent,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO display_components (content_type, mode, field_name, component_type, weight, label_display)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(content_type, mode, field_name) DO UPDATE SET
                   component_type = excluded.component_type,
                   weight = excluded.weight,
                   label_display = excluded.label_display"#
        )
        .bind(content_type)
        .bind(mode.as_str())
        .bind(field_name)
        .bind(&component.component_type)
        .bind(component.weight)
        .bind(&component.label)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::provision(format!("{content_type}.{}", mode.as_str()), e))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct DisplayComponentRow {
    component_type: String,
    weight: i32,
    label_display: Option<String>,
}

impl From<DisplayComponentRow> for DisplayComponent {
    fn from(row: DisplayComponentRow) -> Self {
        Self {
            component_type: row.component_type,
            weight: row.weight,
            label: row.label_display,
        }
    }
}
