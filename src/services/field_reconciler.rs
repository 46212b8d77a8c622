//! Content-type field reconciliation.
//!
//! Brings the set of content types carrying the workflow field in line with
//! the enabled set from settings. Safe to run repeatedly: a second run with the
//! same input makes no attach or detach calls.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ContentTypeOutcome, DisplayComponent, DisplayMode, DisplayStatus, FieldSettings,
    ReconcileAction, ReconcileReport,
};
use crate::domain::ports::FieldProvisioner;

pub struct FieldReconciler<P: FieldProvisioner> {
    provisioner: Arc<P>,
    field: FieldSettings,
}

impl<P: FieldProvisioner> FieldReconciler<P> {
    pub fn new(provisioner: Arc<P>, field: FieldSettings) -> Self {
        Self { provisioner, field }
    }

    pub fn field_name(&self) -> &str {
        &self.field.field_name
    }

    /// Attach the field to every desired content type and detach it from
    /// every other one.
    ///
    /// Content types are processed in lexicographic order. Failures on one
    /// content type are recorded in the report and do not stop the others;
    /// only a failure to create the storage or to read the current state is
    /// returned as an error.
    #[instrument(skip(self, desired), fields(field = %self.field.field_name, desired = desired.len()))]
    pub async fn reconcile(&self, desired: &BTreeSet<String>) -> DomainResult<ReconcileReport> {
        let field_name = self.field.field_name.as_str();

        let storage_created = self.provisioner.ensure_storage(&self.field.storage_spec()).await?;
        if storage_created {
            info!(field = field_name, "Created shared field storage");
        }

        let known: BTreeSet<String> = self
            .provisioner
            .content_types()
            .await?
            .into_iter()
            .map(|ct| ct.id)
            .collect();
        let existing = self.provisioner.list_attached(field_name).await?;

        let mut report = ReconcileReport {
            field_name: field_name.to_string(),
            storage_created,
            ..Default::default()
        };

        for content_type in desired.union(&existing) {
            let action = match (desired.contains(content_type), existing.contains(content_type)) {
                (true, true) => {
                    report.unchanged.push(content_type.clone());
                    continue;
                }
                (true, false) if !known.contains(content_type) => {
                    warn!(content_type = %content_type, "Enabled content type does not exist, skipping");
                    ReconcileAction::SkippedUnknown
                }
                (true, false) => self.attach(content_type).await,
                (false, _) => self.detach(content_type).await,
            };

            report.outcomes.push(ContentTypeOutcome {
                content_type: content_type.clone(),
                action,
            });
        }

        info!(
            attached = report.attached().len(),
            detached = report.detached().len(),
            failed = report.failures().len(),
            unchanged = report.unchanged.len(),
            "Field reconciliation complete"
        );
        Ok(report)
    }

    async fn attach(&self, content_type: &str) -> ReconcileAction {
        let field_name = self.field.field_name.as_str();

        if let Err(e) = self
            .provisioner
            .attach(field_name, content_type, &self.field.defaults())
            .await
        {
            warn!(content_type, error = %e, "Failed to attach field");
            return ReconcileAction::AttachFailed { error: e.to_string() };
        }
        info!(content_type, "Attached field");

        let form_display = self
            .configure_display(content_type, DisplayMode::Form, &self.field.form_widget)
            .await;
        let view_display = self
            .configure_display(content_type, DisplayMode::View, &self.field.view_formatter)
            .await;

        ReconcileAction::Attached {
            form_display,
            view_display,
        }
    }

    async fn configure_display(
        &self,
        content_type: &str,
        mode: DisplayMode,
        component: &DisplayComponent,
    ) -> DisplayStatus {
        match self.provisioner.display_exists(content_type, mode).await {
            Ok(false) => {
                debug!(content_type, mode = mode.as_str(), "No display to configure");
                DisplayStatus::NoDisplay
            }
            Ok(true) => match self
                .provisioner
                .set_display_component(content_type, mode, &self.field.field_name, component)
                .await
            {
                Ok(()) => DisplayStatus::Configured,
                Err(e) => {
                    warn!(content_type, mode = mode.as_str(), error = %e, "Failed to configure display");
                    DisplayStatus::Failed(e.to_string())
                }
            },
            Err(e) => {
                warn!(content_type, mode = mode.as_str(), error = %e, "Failed to look up display");
                DisplayStatus::Failed(e.to_string())
            }
        }
    }

    async fn detach(&self, content_type: &str) -> ReconcileAction {
        match self.provisioner.detach(&self.field.field_name, content_type).await {
            Ok(()) => {
                info!(content_type, "Detached field");
                ReconcileAction::Detached
            }
            Err(e) => {
                warn!(content_type, error = %e, "Failed to detach field");
                ReconcileAction::DetachFailed { error: e.to_string() }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{Call, RecordingProvisioner};
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn reconciler(provisioner: &Arc<RecordingProvisioner>) -> FieldReconciler<RecordingProvisioner> {
        FieldReconciler::new(Arc::clone(provisioner), FieldSettings::default())
    }

    #[tokio::test]
    async fn test_second_run_makes_no_changes() {
        let provisioner = Arc::new(RecordingProvisioner::with_types(&["article", "page"]));
        let reconciler = reconciler(&provisioner);
        let desired = set(&["article", "page"]);

        let first = reconciler.reconcile(&desired).await.unwrap();
        assert!(first.storage_created);
        assert_eq!(first.attached(), vec!["article", "page"]);

        provisioner.clear_calls();
        let second = reconciler.reconcile(&desired).await.unwrap();
        assert!(!second.storage_created);
        assert!(!second.has_changes());
        assert_eq!(second.unchanged, vec!["article", "page"]);
        assert_eq!(provisioner.calls(), vec![Call::EnsureStorage]);
        assert_eq!(provisioner.attached(), desired);
    }

    #[tokio::test]
    async fn test_symmetric_difference_only() {
        let provisioner = Arc::new(RecordingProvisioner::with_types(&["a", "b", "c"]));
        provisioner.pre_attach("a");
        provisioner.pre_attach("b");

        let report = reconciler(&provisioner).reconcile(&set(&["b", "c"])).await.unwrap();

        assert_eq!(provisioner.count(|c| matches!(c, Call::Detach(ct) if ct == "a")), 1);
        assert_eq!(provisioner.count(|c| matches!(c, Call::Attach(ct) if ct == "c")), 1);
        assert_eq!(provisioner.count(|c| matches!(c, Call::Attach(_) | Call::Detach(_))), 2);
        assert_eq!(report.unchanged, vec!["b"]);
        assert_eq!(provisioner.attached(), set(&["b", "c"]));
    }

    #[tokio::test]
    async fn test_attach_configures_existing_displays_only() {
        let provisioner = Arc::new(RecordingProvisioner::with_types(&["page"]));
        provisioner.remove_display("page", DisplayMode::View);

        let report = reconciler(&provisioner).reconcile(&set(&["page"])).await.unwrap();

        assert_eq!(
            report.outcomes[0].action,
            ReconcileAction::Attached {
                form_display: DisplayStatus::Configured,
                view_display: DisplayStatus::NoDisplay,
            }
        );
        assert!(report.is_success());
        let widget = provisioner.component("page", DisplayMode::Form).unwrap();
        assert_eq!(widget.component_type, "options_select");
        assert!(provisioner.component("page", DisplayMode::View).is_none());
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        let provisioner = Arc::new(RecordingProvisioner::with_types(&["a", "b", "c", "d"]));
        provisioner.pre_attach("d");
        provisioner.fail_attach("a");
        provisioner.fail_detach("d");

        let report = reconciler(&provisioner).reconcile(&set(&["a", "b", "c"])).await.unwrap();

        let order: Vec<&str> = report.outcomes.iter().map(|o| o.content_type.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
        assert_eq!(report.failures().len(), 2);
        assert_eq!(report.attached(), vec!["b", "c"]);
        assert!(!report.is_success());
        assert_eq!(provisioner.attached(), set(&["b", "c", "d"]));
    }

    #[tokio::test]
    async fn test_unknown_content_type_is_skipped() {
        let provisioner = Arc::new(RecordingProvisioner::with_types(&["page"]));

        let report = reconciler(&provisioner).reconcile(&set(&["ghost", "page"])).await.unwrap();

        assert_eq!(report.outcomes[0].content_type, "ghost");
        assert_eq!(report.outcomes[0].action, ReconcileAction::SkippedUnknown);
        assert_eq!(provisioner.count(|c| matches!(c, Call::Attach(ct) if ct == "ghost")), 0);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_storage_failure_aborts() {
        let provisioner = Arc::new(RecordingProvisioner::with_types(&["page"]));
        provisioner.fail_storage();

        let result = reconciler(&provisioner).reconcile(&set(&["page"])).await;

        assert!(result.is_err());
        assert_eq!(provisioner.count(|c| matches!(c, Call::Attach(_))), 0);
    }

    #[tokio::test]
    async fn test_empty_desired_detaches_everything() {
        let provisioner = Arc::new(RecordingProvisioner::with_types(&["page", "article"]));
        provisioner.pre_attach("page");
        provisioner.pre_attach("article");

        let report = reconciler(&provisioner).reconcile(&BTreeSet::new()).await.unwrap();

        assert_eq!(report.detached(), vec!["article", "page"]);
        assert!(provisioner.attached().is_empty());
    }
}
