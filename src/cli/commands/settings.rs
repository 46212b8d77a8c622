//! Workflow settings CLI commands: inspect settings and apply them to content types.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::cli::context::{load_config, AppContext};
use crate::cli::display::{action_failure, action_success, list_table, output, CommandOutput, DetailView};
use crate::domain::models::{DisplayStatus, ReconcileAction, ReconcileReport};
use crate::domain::ports::FieldProvisioner;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show workflow settings and which content types carry the field
    Show,
    /// Attach or detach the workflow field so it matches the enabled content types
    Apply {
        /// Replace the enabled content types (comma-separated) and save them
        /// to the configuration file before reconciling
        #[arg(long, value_delimiter = ',')]
        content_types: Option<Vec<String>>,
    },
}

#[derive(Debug, Serialize)]
pub struct ContentTypeStatus {
    pub id: String,
    pub label: String,
    pub enabled: bool,
    pub attached: bool,
}

#[derive(Debug, Serialize)]
pub struct SettingsOutput {
    pub field_name: String,
    pub resource_vocabulary: String,
    pub assignable_kinds: Vec<String>,
    pub content_types: Vec<ContentTypeStatus>,
}

impl CommandOutput for SettingsOutput {
    fn to_human(&self) -> String {
        let detail = DetailView::new("Workflow settings")
            .field("Field", &self.field_name)
            .field("Vocabulary", &self.resource_vocabulary)
            .field("Assignable", &self.assignable_kinds.join(", "))
            .render();

        let mut table = list_table(&["content type", "label", "enabled", "attached"]);
        for ct in &self.content_types {
            table.add_row(vec![
                ct.id.clone(),
                ct.label.clone(),
                yes_no(ct.enabled).to_string(),
                yes_no(ct.attached).to_string(),
            ]);
        }

        if self.content_types.is_empty() {
            format!("{detail}\n\nNo content types registered.")
        } else {
            format!("{detail}\n\n{table}")
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[derive(Debug, Serialize)]
pub struct ReconcileOutput {
    #[serde(flatten)]
    pub report: ReconcileReport,
}

impl CommandOutput for ReconcileOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = Vec::new();

        if report.storage_created {
            lines.push(action_success(&format!("Created field storage '{}'", report.field_name)));
        }

        for outcome in &report.outcomes {
            let ct = &outcome.content_type;
            lines.push(match &outcome.action {
                ReconcileAction::Attached {
                    form_display,
                    view_display,
                } => {
                    let line = format!(
                        "Attached to '{ct}' (form: {}, view: {})",
                        display_text(form_display),
                        display_text(view_display)
                    );
                    if outcome.action.is_failure() {
                        action_failure(&line)
                    } else {
                        action_success(&line)
                    }
                }
                ReconcileAction::Detached => action_success(&format!("Detached from '{ct}'")),
                ReconcileAction::AttachFailed { error } => {
                    action_failure(&format!("Failed to attach to '{ct}': {error}"))
                }
                ReconcileAction::DetachFailed { error } => {
                    action_failure(&format!("Failed to detach from '{ct}': {error}"))
                }
                ReconcileAction::SkippedUnknown => {
                    action_failure(&format!("Skipped '{ct}': no such content type"))
                }
            });
        }

        if !report.has_changes() {
            lines.push(format!(
                "No changes; field '{}' already matches settings.",
                report.field_name
            ));
        }

        lines.join("\n")
    }
}

fn display_text(status: &DisplayStatus) -> String {
    match status {
        DisplayStatus::Configured => "configured".to_string(),
        DisplayStatus::NoDisplay => "no display".to_string(),
        DisplayStatus::Failed(e) => format!("failed: {e}"),
    }
}

fn normalize(content_types: Vec<String>) -> BTreeSet<String> {
    content_types
        .into_iter()
        .map(|ct| ct.trim().to_string())
        .filter(|ct| !ct.is_empty())
        .collect()
}

/// Save a new enabled set, then check that configuration now yields it.
fn store_enabled_content_types(ctx: &AppContext, enabled: &BTreeSet<String>) -> Result<()> {
    let enabled: Vec<String> = enabled.iter().cloned().collect();

    let mut updated = ctx.config.clone();
    updated.workflow.enabled_content_types = enabled.clone();
    ConfigLoader::validate(&updated)?;

    let path = ctx.settings_file();
    ConfigLoader::write_enabled_content_types(path, &enabled)?;

    let reloaded = load_config(ctx.config_path.as_deref())?;
    if reloaded.workflow.enabled_content_types != enabled {
        bail!(
            "Enabled content types were saved to {} but another configuration source overrides them",
            path.display()
        );
    }
    Ok(())
}

pub async fn execute(args: SettingsArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    match args.command {
        SettingsCommands::Show => {
            let provisioner = ctx.provisioner();
            let attached = provisioner.list_attached(&ctx.config.field.field_name).await?;
            let content_types = provisioner
                .content_types()
                .await?
                .into_iter()
                .map(|ct| ContentTypeStatus {
                    enabled: ctx.config.workflow.is_enabled(&ct.id),
                    attached: attached.contains(&ct.id),
                    id: ct.id,
                    label: ct.label,
                })
                .collect();

            let out = SettingsOutput {
                field_name: ctx.config.field.field_name.clone(),
                resource_vocabulary: ctx.config.workflow.resource_vocabulary.clone(),
                assignable_kinds: ctx
                    .config
                    .workflow
                    .assignable_kinds()
                    .options()
                    .into_iter()
                    .map(|(_, label)| label)
                    .collect(),
                content_types,
            };
            output(&out, json_mode);
        }

        SettingsCommands::Apply { content_types } => {
            let desired = match content_types {
                Some(types) => {
                    let enabled = normalize(types);
                    store_enabled_content_types(ctx, &enabled)?;
                    enabled
                }
                None => normalize(ctx.config.workflow.enabled_content_types.clone()),
            };

            let report = ctx.reconciler().reconcile(&desired).await?;
            let failures = report.failures().len();
            output(&ReconcileOutput { report }, json_mode);

            if failures > 0 {
                bail!("{failures} content type(s) could not be reconciled");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Config, ContentType, DisplayMode};

    async fn open_site(dir: &std::path::Path) -> AppContext {
        let config_path = dir.join("config.yaml");
        let mut config = Config::default();
        config.database.path = dir.join("worklist.db").display().to_string();
        config.workflow.enabled_content_types = vec!["article".to_string()];
        std::fs::write(&config_path, serde_yaml::to_string(&config).unwrap()).unwrap();

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        let ctx = AppContext::open(config, Some(config_path)).await.unwrap();

        let directory = ctx.directory();
        for (id, label) in [("article", "Article"), ("page", "Basic page")] {
            directory.register_content_type(&ContentType::new(id, label)).await.unwrap();
            directory.register_display(id, DisplayMode::Form).await.unwrap();
        }
        directory.register_content(1, "page", "Home").await.unwrap();
        ctx.list_service().create("desk", "Desk", None).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_apply_override_saves_enabled_types() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = open_site(dir.path()).await;

        let args = SettingsArgs {
            command: SettingsCommands::Apply {
                content_types: Some(vec!["page".to_string()]),
            },
        };
        execute(args, &ctx, true).await.unwrap();

        let saved = ConfigLoader::load_from_file(ctx.settings_file()).unwrap();
        assert_eq!(saved.workflow.enabled_content_types, vec!["page"]);

        // The next invocation sees the saved settings and the attached field.
        let next = AppContext::open(saved, ctx.config_path.clone()).await.unwrap();
        let item = next.content_service().assign(1, "desk").await.unwrap();
        assert_eq!(item.workflow_id.as_deref(), Some("desk"));

        let attached = next.provisioner().list_attached(&next.config.field.field_name).await.unwrap();
        assert_eq!(attached.into_iter().collect::<Vec<_>>(), vec!["page"]);
    }

    #[tokio::test]
    async fn test_apply_override_of_blank_entries_disables_all() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = open_site(dir.path()).await;

        let args = SettingsArgs {
            command: SettingsCommands::Apply {
                content_types: Some(vec![" ".to_string(), String::new()]),
            },
        };
        execute(args, &ctx, true).await.unwrap();
        let saved = ConfigLoader::load_from_file(ctx.settings_file()).unwrap();
        assert!(saved.workflow.enabled_content_types.is_empty());
    }
}
