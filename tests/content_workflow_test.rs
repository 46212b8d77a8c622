//! End-to-end flow: enable content types, reconcile the field, then assign
//! workflow lists to content.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::{seed_site, test_pool};
use worklist::adapters::sqlite::{
    SqliteContentRepository, SqliteDirectory, SqliteFieldProvisioner, SqliteWorkflowListRepository,
};
use worklist::domain::errors::DomainError;
use worklist::domain::models::{EntityRef, FieldSettings, WorkflowSettings};
use worklist::services::{ContentWorkflowService, FieldReconciler, WorkflowListService};

struct Site {
    content: Arc<SqliteContentRepository>,
    lists: Arc<SqliteWorkflowListRepository>,
    provisioner: Arc<SqliteFieldProvisioner>,
    directory: Arc<SqliteDirectory>,
    field: FieldSettings,
}

impl Site {
    async fn new() -> Self {
        let pool = test_pool().await;
        let directory = Arc::new(seed_site(&pool).await);
        Self {
            content: Arc::new(SqliteContentRepository::new(pool.clone())),
            lists: Arc::new(SqliteWorkflowListRepository::new(pool.clone())),
            provisioner: Arc::new(SqliteFieldProvisioner::new(pool)),
            directory,
            field: FieldSettings::default(),
        }
    }

    fn settings(enabled: &[&str]) -> WorkflowSettings {
        WorkflowSettings {
            enabled_content_types: enabled.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    async fn apply(&self, settings: &WorkflowSettings) {
        let desired: BTreeSet<String> = settings.enabled_content_types.iter().cloned().collect();
        let report = FieldReconciler::new(self.provisioner.clone(), self.field.clone())
            .reconcile(&desired)
            .await
            .unwrap();
        assert!(report.is_success());
    }

    fn content_service(
        &self,
        settings: WorkflowSettings,
    ) -> ContentWorkflowService<
        SqliteContentRepository,
        SqliteWorkflowListRepository,
        SqliteFieldProvisioner,
        SqliteDirectory,
    > {
        ContentWorkflowService::new(
            self.content.clone(),
            self.lists.clone(),
            self.provisioner.clone(),
            self.directory.clone(),
            settings,
            self.field.field_name.clone(),
        )
    }

    fn list_service(
        &self,
        settings: &WorkflowSettings,
    ) -> WorkflowListService<SqliteWorkflowListRepository, SqliteDirectory> {
        WorkflowListService::new(self.lists.clone(), self.directory.clone(), settings)
    }
}

#[tokio::test]
async fn test_assign_after_enabling_content_type() {
    let site = Site::new().await;
    let settings = Site::settings(&["page", "article"]);
    site.apply(&settings).await;

    let lists = site.list_service(&settings);
    lists.create("editorial", "Editorial", None).await.unwrap();
    lists
        .add_assignment("editorial", EntityRef::user(1), Some("Lead"), None)
        .await
        .unwrap();
    lists.add_tag("editorial", 12).await.unwrap();

    let service = site.content_service(settings);
    service.assign(1, "editorial").await.unwrap();
    service.assign(2, "editorial").await.unwrap();

    let view = service.view(1).await.unwrap();
    let workflow = view.workflow.expect("workflow should resolve");
    assert_eq!(workflow.assignments[0].label, "alice");
    assert_eq!(workflow.assignments[0].title, "Lead");
    assert_eq!(workflow.resources[0].name, "Archive");

    let tagged = site.content.list_by_workflow("editorial").await.unwrap();
    let ids: Vec<u64> = tagged.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_disabled_content_type_cannot_be_assigned() {
    let site = Site::new().await;
    let settings = Site::settings(&["page"]);
    site.apply(&settings).await;
    site.list_service(&settings)
        .create("editorial", "Editorial", None)
        .await
        .unwrap();

    let service = site.content_service(settings);
    let err = service.assign(3, "editorial").await.unwrap_err();
    assert!(matches!(err, DomainError::ContentTypeNotEnabled(ct) if ct == "event"));
}

#[tokio::test]
async fn test_enabled_without_reconcile_reports_missing_field() {
    let site = Site::new().await;
    let settings = Site::settings(&["event"]);
    site.list_service(&settings)
        .create("editorial", "Editorial", None)
        .await
        .unwrap();

    let err = site.content_service(settings).assign(3, "editorial").await.unwrap_err();
    assert!(matches!(err, DomainError::FieldNotAttached { content_type, .. } if content_type == "event"));
}

#[tokio::test]
async fn test_deleted_list_leaves_dangling_reference() {
    let site = Site::new().await;
    let settings = Site::settings(&["page"]);
    site.apply(&settings).await;

    let lists = site.list_service(&settings);
    lists.create("editorial", "Editorial", None).await.unwrap();

    let service = site.content_service(settings);
    service.assign(1, "editorial").await.unwrap();
    lists.delete("editorial").await.unwrap();

    let view = service.view(1).await.unwrap();
    assert_eq!(view.content.workflow_id.as_deref(), Some("editorial"));
    assert!(view.workflow.is_none());

    let cleared = service.clear(1).await.unwrap();
    assert!(cleared.workflow_id.is_none());
}
