//! Workflow list CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::display::{
    action_success, action_unchanged, list_table, output, render_list, truncate, CommandOutput, DetailView,
};
use crate::domain::models::{AssignmentInput, EntityRef, ListSummary, WorkflowList, WorkflowListView};
use crate::services::summarize;

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(subcommand)]
    pub command: ListCommands,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a workflow list
    Create {
        /// Machine name (lowercase letters, digits, underscores)
        id: String,
        /// Human-readable label
        label: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show a workflow list with resolved assignments and resources
    Show { id: String },
    /// List all workflow lists
    Ls,
    /// Change label, description or the full assignment list
    Edit {
        id: String,
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Replace all assignments with a JSON array of
        /// {"target_type", "target_id", "title", "comment"} objects
        #[arg(long)]
        assignments: Option<String>,
    },
    /// Delete a workflow list
    Delete { id: String },
    /// Assign a user or group (e.g. user:5, group:2)
    Assign {
        id: String,
        entity: EntityRef,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Remove an assigned user or group
    Unassign { id: String, entity: EntityRef },
    /// Add a resource location tag
    Tag { id: String, tag_id: u64 },
    /// Remove a resource location tag
    Untag { id: String, tag_id: u64 },
    /// Replace assignments and resource tags in one save
    QuickEdit {
        id: String,
        /// Assignment as kind:id; malformed entries are dropped
        #[arg(short, long = "entry")]
        entries: Vec<String>,
        /// Resource tag id
        #[arg(short, long = "tag")]
        tags: Vec<u64>,
    },
}

#[derive(Debug, Serialize)]
pub struct WorkflowListOutput {
    pub id: String,
    pub label: String,
    pub description: String,
    pub summary: ListSummary,
    pub created: Option<String>,
    pub changed: Option<String>,
}

impl From<&WorkflowList> for WorkflowListOutput {
    fn from(list: &WorkflowList) -> Self {
        Self {
            id: list.id().to_string(),
            label: list.label().to_string(),
            description: list.description().to_string(),
            summary: summarize(list),
            created: list.created_at().map(|t| t.to_rfc3339()),
            changed: list.changed_at().map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkflowListsOutput {
    pub lists: Vec<WorkflowListOutput>,
    pub total: usize,
}

impl CommandOutput for WorkflowListsOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "label", "assigned", "resources"]);
        for list in &self.lists {
            table.add_row(vec![
                list.id.clone(),
                truncate(&list.label, 40),
                list.summary.assigned_text(),
                list.summary.resources_text(),
            ]);
        }
        render_list("workflow list", table, self.total)
    }
}

#[derive(Debug, Serialize)]
pub struct WorkflowListDetailOutput {
    #[serde(flatten)]
    pub view: WorkflowListView,
    pub created: Option<String>,
    pub changed: Option<String>,
}

impl CommandOutput for WorkflowListDetailOutput {
    fn to_human(&self) -> String {
        render_view(&self.view, self.created.as_deref(), self.changed.as_deref())
    }
}

/// Shared by `list show` and `content show`.
pub fn render_view(view: &WorkflowListView, created: Option<&str>, changed: Option<&str>) -> String {
    let description = (!view.description.is_empty()).then_some(view.description.as_str());
    let mut detail = DetailView::new(&view.label)
        .field("ID", &view.id)
        .field_opt("Description", description)
        .field_opt("Created", created)
        .field_opt("Changed", changed)
        .section("Assigned");

    for assignment in &view.assignments {
        let mut line = format!("{} ({} {})", assignment.label, assignment.kind, assignment.id);
        if !assignment.title.is_empty() {
            line.push_str(&format!(" - {}", assignment.title));
        }
        if !assignment.comment.is_empty() {
            line.push_str(&format!(": {}", assignment.comment));
        }
        detail = detail.item(&line);
    }

    detail = detail.section("Resources");
    for tag in &view.resources {
        detail = detail.item(&format!("{} ({})", tag.name, tag.id));
    }

    detail.render()
}

#[derive(Debug, Serialize)]
pub struct ListActionOutput {
    pub success: bool,
    pub changed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<WorkflowListOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<usize>,
}

impl ListActionOutput {
    fn changed(message: String, list: Option<&WorkflowList>) -> Self {
        Self {
            success: true,
            changed: true,
            message,
            list: list.map(WorkflowListOutput::from),
            dropped: None,
        }
    }

    fn unchanged(message: String) -> Self {
        Self {
            success: true,
            changed: false,
            message,
            list: None,
            dropped: None,
        }
    }
}

impl CommandOutput for ListActionOutput {
    fn to_human(&self) -> String {
        let mut text = if self.changed {
            action_success(&self.message)
        } else {
            action_unchanged(&self.message)
        };
        if let Some(dropped) = self.dropped.filter(|d| *d > 0) {
            text.push_str(&format!("\n  ({dropped} malformed or duplicate entries dropped)"));
        }
        text
    }
}

/// Lenient `kind:id` parse for bulk input; bad pieces become missing fields.
fn parse_entry(raw: &str) -> AssignmentInput {
    let (kind, id) = raw.split_once(':').unwrap_or((raw, ""));
    AssignmentInput {
        kind: Some(kind.trim().to_string()).filter(|k| !k.is_empty()),
        id: id.trim().parse().ok(),
        ..Default::default()
    }
}

pub async fn execute(args: ListArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ctx.list_service();

    match args.command {
        ListCommands::Create { id, label, description } => {
            let list = service.create(&id, &label, description.as_deref()).await?;
            let out = ListActionOutput::changed(format!("Created workflow list '{}'", list.id()), Some(&list));
            output(&out, json_mode);
        }

        ListCommands::Show { id } => {
            let list = service.require(&id).await?;
            let out = WorkflowListDetailOutput {
                view: ctx.display().view(&list).await,
                created: list.created_at().map(|t| t.to_rfc3339()),
                changed: list.changed_at().map(|t| t.to_rfc3339()),
            };
            output(&out, json_mode);
        }

        ListCommands::Ls => {
            let lists = service.list().await?;
            let out = WorkflowListsOutput {
                total: lists.len(),
                lists: lists.iter().map(WorkflowListOutput::from).collect(),
            };
            output(&out, json_mode);
        }

        ListCommands::Edit {
            id,
            label,
            description,
            assignments,
        } => {
            let inputs = assignments
                .map(|raw| serde_json::from_str::<Vec<AssignmentInput>>(&raw))
                .transpose()
                .context("--assignments must be a JSON array of assignments")?;
            let (list, dropped) = service
                .edit(&id, label.as_deref(), description.as_deref(), inputs)
                .await?;

            let mut out = ListActionOutput::changed(format!("Updated workflow list '{id}'"), Some(&list));
            out.dropped = dropped;
            output(&out, json_mode);
        }

        ListCommands::Delete { id } => {
            service.delete(&id).await?;
            output(&ListActionOutput::changed(format!("Deleted workflow list '{id}'"), None), json_mode);
        }

        ListCommands::Assign {
            id,
            entity,
            title,
            comment,
        } => {
            let out = if service
                .add_assignment(&id, entity.clone(), title.as_deref(), comment.as_deref())
                .await?
            {
                ListActionOutput::changed(format!("Assigned {entity} to '{id}'"), None)
            } else {
                ListActionOutput::unchanged(format!("{entity} is already assigned to '{id}'"))
            };
            output(&out, json_mode);
        }

        ListCommands::Unassign { id, entity } => {
            let out = if service.remove_assignment(&id, &entity).await? {
                ListActionOutput::changed(format!("Removed {entity} from '{id}'"), None)
            } else {
                ListActionOutput::unchanged(format!("{entity} was not assigned to '{id}'"))
            };
            output(&out, json_mode);
        }

        ListCommands::Tag { id, tag_id } => {
            let out = if service.add_tag(&id, tag_id).await? {
                ListActionOutput::changed(format!("Tagged '{id}' with resource {tag_id}"), None)
            } else {
                ListActionOutput::unchanged(format!("'{id}' already has resource {tag_id}"))
            };
            output(&out, json_mode);
        }

        ListCommands::Untag { id, tag_id } => {
            let out = if service.remove_tag(&id, tag_id).await? {
                ListActionOutput::changed(format!("Removed resource {tag_id} from '{id}'"), None)
            } else {
                ListActionOutput::unchanged(format!("'{id}' did not have resource {tag_id}"))
            };
            output(&out, json_mode);
        }

        ListCommands::QuickEdit { id, entries, tags } => {
            let inputs = entries.iter().map(|e| parse_entry(e)).collect();
            let (list, dropped) = service.quick_edit(&id, inputs, tags).await?;
            let mut out = ListActionOutput::changed(format!("Updated workflow list '{id}'"), Some(&list));
            out.dropped = Some(dropped);
            output(&out, json_mode);
        }
    }

    Ok(())
}
