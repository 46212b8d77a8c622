//! Assigning workflow lists to content items.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ContentItem, ContentWorkflowView, WorkflowSettings};
use crate::domain::ports::{ContentRepository, EntityResolver, FieldProvisioner, WorkflowListRepository};

use super::assignment_display::AssignmentDisplay;

pub struct ContentWorkflowService<C, R, P, E>
where
    C: ContentRepository,
    R: WorkflowListRepository,
    P: FieldProvisioner,
    E: EntityResolver,
{
    content: Arc<C>,
    lists: Arc<R>,
    provisioner: Arc<P>,
    display: AssignmentDisplay<E>,
    settings: WorkflowSettings,
    field_name: String,
}

impl<C, R, P, E> ContentWorkflowService<C, R, P, E>
where
    C: ContentRepository,
    R: WorkflowListRepository,
    P: FieldProvisioner,
    E: EntityResolver,
{
    pub fn new(
        content: Arc<C>,
        lists: Arc<R>,
        provisioner: Arc<P>,
        resolver: Arc<E>,
        settings: WorkflowSettings,
        field_name: impl Into<String>,
    ) -> Self {
        let display = AssignmentDisplay::new(resolver, settings.resource_vocabulary.clone());
        Self {
            content,
            lists,
            provisioner,
            display,
            settings,
            field_name: field_name.into(),
        }
    }

    /// Point a content item at a workflow list.
    #[instrument(skip(self))]
    pub async fn assign(&self, content_id: u64, workflow_id: &str) -> DomainResult<ContentItem> {
        let mut item = self.editable(content_id).await?;

        if !self.lists.exists(workflow_id).await? {
            return Err(DomainError::WorkflowListNotFound(workflow_id.to_string()));
        }

        self.content.set_workflow(content_id, Some(workflow_id)).await?;
        item.workflow_id = Some(workflow_id.to_string());
        info!(content_id, workflow_id, "Assigned workflow list");
        Ok(item)
    }

    /// Remove the workflow list from a content item.
    #[instrument(skip(self))]
    pub async fn clear(&self, content_id: u64) -> DomainResult<ContentItem> {
        let mut item = self.editable(content_id).await?;

        self.content.set_workflow(content_id, None).await?;
        item.workflow_id = None;
        info!(content_id, "Cleared workflow list");
        Ok(item)
    }

    /// The content item with its workflow list resolved for display.
    pub async fn view(&self, content_id: u64) -> DomainResult<ContentWorkflowView> {
        let content = self.require(content_id).await?;

        let workflow = match content.workflow_id.as_deref() {
            Some(id) => match self.lists.get(id).await? {
                Some(list) => Some(self.display.view(&list).await),
                None => {
                    debug!(content_id, workflow_id = id, "Assigned workflow list no longer exists");
                    None
                }
            },
            None => None,
        };

        Ok(ContentWorkflowView { content, workflow })
    }

    async fn require(&self, content_id: u64) -> DomainResult<ContentItem> {
        self.content
            .get(content_id)
            .await?
            .ok_or(DomainError::ContentNotFound(content_id))
    }

    /// Load a content item whose type is enabled and carries the field.
    async fn editable(&self, content_id: u64) -> DomainResult<ContentItem> {
        let item = self.require(content_id).await?;

        if !self.settings.is_enabled(&item.content_type) {
            return Err(DomainError::ContentTypeNotEnabled(item.content_type));
        }

        let attached = self.provisioner.list_attached(&self.field_name).await?;
        if !attached.contains(&item.content_type) {
            return Err(DomainError::FieldNotAttached {
                field_name: self.field_name.clone(),
                content_type: item.content_type,
            });
        }

        Ok(item)
    }
}
