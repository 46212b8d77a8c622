//! Content item CLI commands: the per-item workflow tab.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::commands::list::render_view;
use crate::cli::context::AppContext;
use crate::cli::display::{action_success, output, CommandOutput, DetailView};
use crate::domain::models::{ContentItem, ContentWorkflowView};

#[derive(Args, Debug)]
pub struct ContentArgs {
    #[command(subcommand)]
    pub command: ContentCommands,
}

#[derive(Subcommand, Debug)]
pub enum ContentCommands {
    /// Show a content item and its workflow list
    Show { id: u64 },
    /// Assign a workflow list to a content item
    Assign { id: u64, workflow: String },
    /// Remove the workflow list from a content item
    Clear { id: u64 },
}

#[derive(Debug, Serialize)]
pub struct ContentViewOutput {
    #[serde(flatten)]
    pub view: ContentWorkflowView,
}

impl CommandOutput for ContentViewOutput {
    fn to_human(&self) -> String {
        let content = &self.view.content;
        let header = DetailView::new(&content.title)
            .field("ID", &content.id.to_string())
            .field("Type", &content.content_type)
            .render();

        let workflow = match &self.view.workflow {
            Some(view) => render_view(view, None, None),
            None => "No workflow list assigned.".to_string(),
        };

        format!("{header}\n\n{workflow}")
    }
}

#[derive(Debug, Serialize)]
pub struct ContentActionOutput {
    pub success: bool,
    pub message: String,
    pub content: ContentItem,
}

impl CommandOutput for ContentActionOutput {
    fn to_human(&self) -> String {
        action_success(&self.message)
    }
}

pub async fn execute(args: ContentArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let service = ctx.content_service();

    match args.command {
        ContentCommands::Show { id } => {
            let view = service.view(id).await?;
            output(&ContentViewOutput { view }, json_mode);
        }

        ContentCommands::Assign { id, workflow } => {
            let content = service.assign(id, &workflow).await?;
            let out = ContentActionOutput {
                success: true,
                message: format!("Assigned workflow list '{workflow}' to '{}'", content.title),
                content,
            };
            output(&out, json_mode);
        }

        ContentCommands::Clear { id } => {
            let content = service.clear(id).await?;
            let out = ContentActionOutput {
                success: true,
                message: format!("Cleared workflow list from '{}'", content.title),
                content,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
