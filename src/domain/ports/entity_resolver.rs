//! Entity resolver port.
//!
//! Resolves principals and resource tags to display labels. Results are
//! used for display only and never written back into a workflow list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;
use crate::domain::models::EntityRef;

/// A principal as shown to an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub label: String,
}

#[async_trait]
pub trait EntityResolver: Send + Sync {
    /// Resolve a principal; `Ok(None)` if it does not exist.
    async fn resolve(&self, entity: &EntityRef) -> DomainResult<Option<ResolvedEntity>>;

    /// Resolve a resource tag within a vocabulary; `Ok(None)` if it does not exist.
    async fn resolve_tag(&self, vocabulary: &str, tag_id: u64) -> DomainResult<Option<String>>;
}
