//! Directory CLI commands: seed principals, terms, content types, content
//! items and displays.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::display::{action_success, output, CommandOutput};
use crate::domain::models::{ContentType, DisplayMode, EntityRef};

#[derive(Args, Debug)]
pub struct DirectoryArgs {
    #[command(subcommand)]
    pub command: DirectoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum DirectoryCommands {
    /// Register or relabel a user or group (e.g. user:5 "Alice")
    AddPrincipal { entity: EntityRef, label: String },
    /// Register or rename a taxonomy term
    AddTerm {
        id: u64,
        name: String,
        /// Vocabulary; defaults to the configured resource vocabulary
        #[arg(long)]
        vocabulary: Option<String>,
    },
    /// Register a content type
    AddContentType { id: String, label: String },
    /// Register a content item
    AddContent { id: u64, content_type: String, title: String },
    /// Create a form or view display for a content type
    AddDisplay {
        content_type: String,
        #[arg(value_parser = parse_mode)]
        mode: DisplayMode,
    },
}

fn parse_mode(s: &str) -> Result<DisplayMode, String> {
    DisplayMode::from_str(s).ok_or_else(|| format!("expected 'form' or 'view', got '{s}'"))
}

#[derive(Debug, Serialize)]
pub struct DirectoryOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for DirectoryOutput {
    fn to_human(&self) -> String {
        action_success(&self.message)
    }
}

pub async fn execute(args: DirectoryArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let directory = ctx.directory();

    let message = match args.command {
        DirectoryCommands::AddPrincipal { entity, label } => {
            directory.register_principal(&entity, &label).await?;
            format!("Registered {entity} as '{label}'")
        }

        DirectoryCommands::AddTerm { id, name, vocabulary } => {
            let vocabulary = vocabulary.unwrap_or_else(|| ctx.config.workflow.resource_vocabulary.clone());
            if vocabulary.trim().is_empty() {
                return Err(anyhow!("Vocabulary cannot be empty"));
            }
            directory.register_term(id, &vocabulary, &name).await?;
            format!("Registered term {id} '{name}' in '{vocabulary}'")
        }

        DirectoryCommands::AddContentType { id, label } => {
            directory.register_content_type(&ContentType::new(&id, &label)).await?;
            format!("Registered content type '{id}'")
        }

        DirectoryCommands::AddContent { id, content_type, title } => {
            directory.register_content(id, &content_type, &title).await?;
            format!("Registered {content_type} {id} '{title}'")
        }

        DirectoryCommands::AddDisplay { content_type, mode } => {
            directory.register_display(&content_type, mode).await?;
            format!("Created {} display for '{content_type}'", mode.as_str())
        }
    };

    output(&DirectoryOutput { success: true, message }, json_mode);
    Ok(())
}
