//! Domain errors for the worklist system.

use thiserror::Error;

use super::models::EntityRef;

/// Domain-level errors that can occur in the worklist system.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Workflow list not found: {0}")]
    WorkflowListNotFound(String),

    #[error("Workflow list already exists: {0}")]
    DuplicateId(String),

    #[error("Content item not found: {0}")]
    ContentNotFound(u64),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityRef),

    #[error("Content type '{0}' is not enabled for workflow lists")]
    ContentTypeNotEnabled(String),

    #[error("Field '{field_name}' is not attached to content type '{content_type}'")]
    FieldNotAttached { field_name: String, content_type: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Provisioning failed for '{target}': {reason}")]
    ProvisionFailed { target: String, reason: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Shorthand for a provisioning failure against a named target.
    pub fn provision(target: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ProvisionFailed {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
