//! Workflow list service implementing admin operations on lists.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AssignableKinds, AssignmentInput, EntityKind, EntityRef, WorkflowList, WorkflowSettings,
};
use crate::domain::ports::{EntityResolver, WorkflowListRepository};

pub struct WorkflowListService<R: WorkflowListRepository, E: EntityResolver> {
    repository: Arc<R>,
    resolver: Arc<E>,
    kinds: AssignableKinds,
    vocabulary: String,
}

impl<R: WorkflowListRepository, E: EntityResolver> WorkflowListService<R, E> {
    pub fn new(repository: Arc<R>, resolver: Arc<E>, settings: &WorkflowSettings) -> Self {
        Self {
            repository,
            resolver,
            kinds: settings.assignable_kinds(),
            vocabulary: settings.resource_vocabulary.clone(),
        }
    }

    pub fn assignable_kinds(&self) -> AssignableKinds {
        self.kinds
    }

    /// Create a new, empty workflow list.
    #[instrument(skip(self, description))]
    pub async fn create(&self, id: &str, label: &str, description: Option<&str>) -> DomainResult<WorkflowList> {
        let mut list = WorkflowList::new(id, label);
        if let Some(description) = description {
            list.set_description(description);
        }
        list.validate().map_err(DomainError::ValidationFailed)?;

        if self.repository.exists(id).await? {
            return Err(DomainError::DuplicateId(id.to_string()));
        }

        self.repository.save(&mut list).await?;
        info!(list_id = id, "Created workflow list");
        Ok(list)
    }

    /// Get a workflow list by machine name.
    pub async fn get(&self, id: &str) -> DomainResult<Option<WorkflowList>> {
        self.repository.get(id).await
    }

    /// Get a workflow list, failing if it does not exist.
    pub async fn require(&self, id: &str) -> DomainResult<WorkflowList> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::WorkflowListNotFound(id.to_string()))
    }

    /// All workflow lists, ordered by label.
    pub async fn list(&self) -> DomainResult<Vec<WorkflowList>> {
        self.repository.list_all().await
    }

    /// Change the label, description and/or the full assignment list in a
    /// single save. Nothing is stored if any part is rejected.
    ///
    /// Returns the updated list and, when assignments were replaced, how many
    /// inputs were dropped as malformed or duplicate.
    pub async fn edit(
        &self,
        id: &str,
        label: Option<&str>,
        description: Option<&str>,
        assignments: Option<Vec<AssignmentInput>>,
    ) -> DomainResult<(WorkflowList, Option<usize>)> {
        if let Some(inputs) = &assignments {
            self.check_input_kinds(inputs)?;
        }

        let mut list = self.require(id).await?;
        if let Some(label) = label {
            list.set_label(label);
        }
        if let Some(description) = description {
            list.set_description(description);
        }
        list.validate().map_err(DomainError::ValidationFailed)?;
        let dropped = assignments.map(|inputs| list.set_assignments(inputs));

        self.persist(&mut list).await?;
        debug!(list_id = id, ?dropped, "Edited workflow list");
        Ok((list, dropped))
    }

    /// Replace every assignment. Entries missing a kind or id are dropped and
    /// counted; a kind that is recognised but not assignable is rejected.
    pub async fn replace_assignments(
        &self,
        id: &str,
        inputs: Vec<AssignmentInput>,
    ) -> DomainResult<(WorkflowList, usize)> {
        self.check_input_kinds(&inputs)?;

        let mut list = self.require(id).await?;
        let dropped = list.set_assignments(inputs);
        self.persist(&mut list).await?;

        debug!(list_id = id, dropped, "Replaced assignments");
        Ok((list, dropped))
    }

    /// Add one principal. Returns `false` if it was already assigned, in which
    /// case the existing title and comment are kept.
    #[instrument(skip(self, title, comment), fields(entity = %entity))]
    pub async fn add_assignment(
        &self,
        id: &str,
        entity: EntityRef,
        title: Option<&str>,
        comment: Option<&str>,
    ) -> DomainResult<bool> {
        self.check_kind(&entity.kind)?;

        if self.resolver.resolve(&entity).await?.is_none() {
            return Err(DomainError::EntityNotFound(entity));
        }

        let mut list = self.require(id).await?;
        let added = list.add_assignment(entity, title, comment);
        if added {
            self.persist(&mut list).await?;
        }
        Ok(added)
    }

    /// Remove one principal; absent principals are a no-op.
    pub async fn remove_assignment(&self, id: &str, entity: &EntityRef) -> DomainResult<bool> {
        let mut list = self.require(id).await?;
        let removed = list.remove_assignment(entity);
        if removed {
            self.persist(&mut list).await?;
        }
        Ok(removed)
    }

    /// Replace every resource tag.
    pub async fn replace_tags(&self, id: &str, tag_ids: Vec<u64>) -> DomainResult<WorkflowList> {
        let mut list = self.require(id).await?;
        list.set_tags(tag_ids);
        self.persist(&mut list).await?;
        Ok(list)
    }

    /// Add one resource tag. The term must exist in the resource vocabulary.
    pub async fn add_tag(&self, id: &str, tag_id: u64) -> DomainResult<bool> {
        if tag_id == 0 {
            return Err(DomainError::ValidationFailed("Resource tag id must be positive".to_string()));
        }
        if self.resolver.resolve_tag(&self.vocabulary, tag_id).await?.is_none() {
            return Err(DomainError::ValidationFailed(format!(
                "Term {tag_id} is not in vocabulary '{}'",
                self.vocabulary
            )));
        }

        let mut list = self.require(id).await?;
        let added = list.add_tag(tag_id);
        if added {
            self.persist(&mut list).await?;
        }
        Ok(added)
    }

    /// Remove one resource tag; absent tags are a no-op.
    pub async fn remove_tag(&self, id: &str, tag_id: u64) -> DomainResult<bool> {
        let mut list = self.require(id).await?;
        let removed = list.remove_tag(tag_id);
        if removed {
            self.persist(&mut list).await?;
        }
        Ok(removed)
    }

    /// Replace assignments and resource tags in a single save.
    pub async fn quick_edit(
        &self,
        id: &str,
        inputs: Vec<AssignmentInput>,
        tag_ids: Vec<u64>,
    ) -> DomainResult<(WorkflowList, usize)> {
        self.check_input_kinds(&inputs)?;

        let mut list = self.require(id).await?;
        let dropped = list.set_assignments(inputs);
        list.set_tags(tag_ids);
        self.persist(&mut list).await?;

        info!(list_id = id, dropped, "Quick-edited workflow list");
        Ok((list, dropped))
    }

    /// Delete a workflow list. Content pointing at it keeps a dangling id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repository.delete(id).await?;
        info!(list_id = id, "Deleted workflow list");
        Ok(())
    }

    async fn persist(&self, list: &mut WorkflowList) -> DomainResult<()> {
        if !list.is_dirty() {
            return Ok(());
        }
        let status = self.repository.save(list).await?;
        debug!(list_id = list.id(), ?status, "Saved workflow list");
        Ok(())
    }

    fn check_kind(&self, kind: &EntityKind) -> DomainResult<()> {
        if self.kinds.allows(kind) {
            Ok(())
        } else {
            Err(DomainError::ValidationFailed(format!(
                "Entity kind '{kind}' cannot be assigned"
            )))
        }
    }

    fn check_input_kinds(&self, inputs: &[AssignmentInput]) -> DomainResult<()> {
        inputs
            .iter()
            .filter_map(|input| input.kind.as_deref().and_then(EntityKind::parse))
            .try_for_each(|kind| self.check_kind(&kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteDirectory, SqliteWorkflowListRepository};

    async fn setup_service(groups: bool) -> WorkflowListService<SqliteWorkflowListRepository, SqliteDirectory> {
        let pool = create_migrated_test_pool().await.unwrap();
        let directory = SqliteDirectory::new(pool.clone());
        directory.register_principal(&EntityRef::user(1), "alice").await.unwrap();
        directory.register_principal(&EntityRef::user(2), "bob").await.unwrap();
        directory.register_principal(&EntityRef::group(1), "Editors").await.unwrap();
        directory.register_term(10, "resource_locations", "Studio A").await.unwrap();

        let settings = WorkflowSettings {
            group_kind_enabled: groups,
            ..Default::default()
        };
        WorkflowListService::new(
            Arc::new(SqliteWorkflowListRepository::new(pool)),
            Arc::new(directory),
            &settings,
        )
    }

    #[tokio::test]
    async fn test_create_and_duplicate() {
        let service = setup_service(false).await;

        let list = service.create("editorial", "Editorial", Some("Copy desk")).await.unwrap();
        assert!(!list.is_new());
        assert_eq!(list.description(), "Copy desk");

        let err = service.create("editorial", "Again", None).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateId(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_machine_name() {
        let service = setup_service(false).await;
        let err = service.create("Bad Name", "Label", None).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));

        let err = service.create("ok_name", "  ", None).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_add_assignment_first_write_wins() {
        let service = setup_service(false).await;
        service.create("events", "Events", None).await.unwrap();

        assert!(service.add_assignment("events", EntityRef::user(1), Some("A"), None).await.unwrap());
        assert!(!service.add_assignment("events", EntityRef::user(1), Some("B"), None).await.unwrap());

        let list = service.require("events").await.unwrap();
        assert_eq!(list.assignments().len(), 1);
        assert_eq!(list.assignments().get(&EntityRef::user(1)).unwrap().title, "A");
    }

    #[tokio::test]
    async fn test_add_assignment_checks_kind_and_existence() {
        let service = setup_service(false).await;
        service.create("events", "Events", None).await.unwrap();

        let err = service.add_assignment("events", EntityRef::group(1), None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));

        let err = service.add_assignment("events", EntityRef::user(99), None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::EntityNotFound(e) if e == EntityRef::user(99)));

        let err = service.add_assignment("missing", EntityRef::user(1), None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::WorkflowListNotFound(_)));
    }

    #[tokio::test]
    async fn test_groups_allowed_when_enabled() {
        let service = setup_service(true).await;
        service.create("events", "Events", None).await.unwrap();
        assert!(service.add_assignment("events", EntityRef::group(1), None, None).await.unwrap());
        assert_eq!(service.assignable_kinds().options().len(), 2);
    }

    #[tokio::test]
    async fn test_replace_assignments_drops_malformed() {
        let service = setup_service(false).await;
        service.create("events", "Events", None).await.unwrap();

        let inputs = vec![
            AssignmentInput::new("user", 1),
            AssignmentInput::new("user", 1),
            AssignmentInput {
                kind: Some("user".to_string()),
                id: None,
                ..Default::default()
            },
        ];
        let (list, dropped) = service.replace_assignments("events", inputs).await.unwrap();
        assert_eq!(dropped, 2);
        assert_eq!(list.assignments().user_ids(), vec![1]);

        let err = service
            .replace_assignments("events", vec![AssignmentInput::new("group", 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_rejected_edit_stores_nothing() {
        let service = setup_service(false).await;
        service.create("desk", "Desk", None).await.unwrap();

        let err = service
            .edit(
                "desk",
                Some("Renamed"),
                Some("changed"),
                Some(vec![AssignmentInput::new("group", 1)]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));

        let err = service.edit("desk", Some("  "), None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));

        let stored = service.require("desk").await.unwrap();
        assert_eq!(stored.label(), "Desk");
        assert_eq!(stored.description(), "");
        assert!(stored.assignments().is_empty());
    }

    #[tokio::test]
    async fn test_edit_details_and_assignments_together() {
        let service = setup_service(false).await;
        service.create("desk", "Desk", None).await.unwrap();

        let (list, dropped) = service
            .edit(
                "desk",
                Some("Copy desk"),
                None,
                Some(vec![AssignmentInput::new("user", 2), AssignmentInput::new("user", 2)]),
            )
            .await
            .unwrap();
        assert_eq!(dropped, Some(1));
        assert_eq!(list.label(), "Copy desk");

        let stored = service.require("desk").await.unwrap();
        assert_eq!(stored.label(), "Copy desk");
        assert_eq!(stored.assignments().user_ids(), vec![2]);

        let (_, dropped) = service.edit("desk", None, Some("Night shift"), None).await.unwrap();
        assert_eq!(dropped, None);
        assert_eq!(service.require("desk").await.unwrap().assignments().len(), 1);
    }

    #[tokio::test]
    async fn test_tags() {
        let service = setup_service(false).await;
        service.create("events", "Events", None).await.unwrap();

        assert!(service.add_tag("events", 10).await.unwrap());
        assert!(!service.add_tag("events", 10).await.unwrap());
        assert!(matches!(
            service.add_tag("events", 11).await.unwrap_err(),
            DomainError::ValidationFailed(_)
        ));
        assert!(matches!(
            service.add_tag("events", 0).await.unwrap_err(),
            DomainError::ValidationFailed(_)
        ));

        assert!(service.remove_tag("events", 10).await.unwrap());
        assert!(!service.remove_tag("events", 10).await.unwrap());
    }

    #[tokio::test]
    async fn test_quick_edit_and_delete() {
        let service = setup_service(false).await;
        service.create("events", "Events", None).await.unwrap();

        let (list, dropped) = service
            .quick_edit("events", vec![AssignmentInput::new("user", 2)], vec![10, 10, 0])
            .await
            .unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(list.assignments().user_ids(), vec![2]);
        assert_eq!(list.tags().ids(), &[10]);

        assert!(!service.remove_assignment("events", &EntityRef::user(1)).await.unwrap());
        assert!(service.remove_assignment("events", &EntityRef::user(2)).await.unwrap());

        service.delete("events").await.unwrap();
        assert!(service.get("events").await.unwrap().is_none());
    }
}
