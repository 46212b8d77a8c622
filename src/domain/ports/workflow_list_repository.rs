//! Workflow list repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{SaveStatus, WorkflowList};

/// Repository interface for WorkflowList persistence.
///
/// Writes are last-write-wins; there is no concurrency token.
#[async_trait]
pub trait WorkflowListRepository: Send + Sync {
    /// Get a workflow list by machine name.
    async fn get(&self, id: &str) -> DomainResult<Option<WorkflowList>>;

    /// Persist a workflow list.
    ///
    /// Implementations call [`WorkflowList::on_before_persist`] immediately
    /// before writing and [`WorkflowList::mark_clean`] after the write succeeds.
    async fn save(&self, list: &mut WorkflowList) -> DomainResult<SaveStatus>;

    /// Delete a workflow list. Content still pointing at it is left alone.
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// List all workflow lists, ordered by label.
    async fn list_all(&self) -> DomainResult<Vec<WorkflowList>>;

    /// Whether a list with this machine name exists.
    async fn exists(&self, id: &str) -> DomainResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
