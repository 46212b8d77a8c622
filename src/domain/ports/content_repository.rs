//! Content repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::ContentItem;

/// Access to content items and their single workflow reference.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Get a content item by id.
    async fn get(&self, id: u64) -> DomainResult<Option<ContentItem>>;

    /// Set or clear the workflow list a content item points at.
    async fn set_workflow(&self, id: u64, workflow_id: Option<&str>) -> DomainResult<()>;
}
