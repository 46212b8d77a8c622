//! SQLite database adapters for worklist.

pub mod connection;
pub mod content_repository;
pub mod directory;
pub mod field_provisioner;
pub mod migrations;
pub mod workflow_list_repository;

pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use content_repository::SqliteContentRepository;
pub use directory::SqliteDirectory;
pub use field_provisioner::SqliteFieldProvisioner;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use workflow_list_repository::SqliteWorkflowListRepository;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a JSON string from a SQLite row field, falling back to the type's default.
pub fn parse_json_or_default<T: serde::de::DeserializeOwned + Default>(s: Option<String>) -> DomainResult<T> {
    s.filter(|s| !s.trim().is_empty())
        .map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|opt| opt.unwrap_or_default())
}

/// SQLite integers are signed; reject ids that do not fit.
pub fn to_sql_id(id: u64) -> DomainResult<i64> {
    i64::try_from(id).map_err(|_| DomainError::ValidationFailed(format!("id {id} is out of range")))
}

/// Read back a stored integer id.
pub fn from_sql_id(id: i64) -> DomainResult<u64> {
    u64::try_from(id).map_err(|_| DomainError::SerializationError(format!("negative id {id} in storage")))
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open the database at `database_url` and apply pending migrations.
pub async fn initialize_database(
    database_url: &str,
    config: Option<PoolConfig>,
) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, config).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AssignmentSet;

    #[test]
    fn test_parse_json_or_default_blank() {
        let set: AssignmentSet = parse_json_or_default(None).unwrap();
        assert!(set.is_empty());
        let set: AssignmentSet = parse_json_or_default(Some("  ".to_string())).unwrap();
        assert!(set.is_empty());
        assert!(parse_json_or_default::<AssignmentSet>(Some("{bad".to_string())).is_err());
    }

    #[test]
    fn test_sql_id_bounds() {
        assert_eq!(to_sql_id(42).unwrap(), 42);
        assert!(to_sql_id(u64::MAX).is_err());
        assert!(from_sql_id(-1).is_err());
    }
}
