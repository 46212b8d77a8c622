//! Resolves workflow list contents into displayable views.
//!
//! Labels are looked up through the [`EntityResolver`] on every call and are
//! never written back into the list.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::models::{
    AssignmentSet, EntityKind, ListSummary, ResolvedAssignment, ResolvedTag, ResourceTagSet,
    WorkflowList, WorkflowListView,
};
use crate::domain::ports::EntityResolver;

/// Counts of assigned users, groups and resources.
pub fn summarize(list: &WorkflowList) -> ListSummary {
    let assignments = list.assignments();
    ListSummary {
        users: assignments.iter().filter(|e| e.entity.kind == EntityKind::User).count(),
        groups: assignments.iter().filter(|e| e.entity.kind == EntityKind::Group).count(),
        resources: list.tags().len(),
    }
}

pub struct AssignmentDisplay<E: EntityResolver> {
    resolver: Arc<E>,
    vocabulary: String,
}

impl<E: EntityResolver> AssignmentDisplay<E> {
    pub fn new(resolver: Arc<E>, vocabulary: impl Into<String>) -> Self {
        Self {
            resolver,
            vocabulary: vocabulary.into(),
        }
    }

    /// Resolve each assignment, in order, omitting principals that no longer
    /// exist or could not be looked up.
    pub async fn resolve_assignments(&self, assignments: &AssignmentSet) -> Vec<ResolvedAssignment> {
        let mut resolved = Vec::with_capacity(assignments.len());
        for entry in assignments.iter() {
            match self.resolver.resolve(&entry.entity).await {
                Ok(Some(entity)) => resolved.push(ResolvedAssignment {
                    kind: entry.entity.kind.clone(),
                    id: entry.entity.id,
                    label: entity.label,
                    title: entry.title.clone(),
                    comment: entry.comment.clone(),
                }),
                Ok(None) => debug!(entity = %entry.entity, "Assigned entity no longer exists"),
                Err(e) => warn!(entity = %entry.entity, error = %e, "Failed to resolve assigned entity"),
            }
        }
        resolved
    }

    /// Resolve tag ids to term names in the resource vocabulary.
    pub async fn resolve_tags(&self, tags: &ResourceTagSet) -> Vec<ResolvedTag> {
        let mut resolved = Vec::with_capacity(tags.len());
        for &id in tags.ids() {
            match self.resolver.resolve_tag(&self.vocabulary, id).await {
                Ok(Some(name)) => resolved.push(ResolvedTag { id, name }),
                Ok(None) => debug!(tag_id = id, vocabulary = %self.vocabulary, "Resource tag no longer exists"),
                Err(e) => warn!(tag_id = id, error = %e, "Failed to resolve resource tag"),
            }
        }
        resolved
    }

    pub async fn view(&self, list: &WorkflowList) -> WorkflowListView {
        WorkflowListView {
            id: list.id().to_string(),
            label: list.label().to_string(),
            description: list.description().to_string(),
            assignments: self.resolve_assignments(list.assignments()).await,
            resources: self.resolve_tags(list.tags()).await,
            summary: summarize(list),
        }
    }
}
