//! Implementation of the `worklist init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::display::{action_failure, action_success, output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub directories_created: Vec<String>,
    pub config_written: bool,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![if self.success {
            action_success(&self.message)
        } else {
            action_failure(&self.message)
        }];
        if !self.directories_created.is_empty() {
            lines.push("\nCreated directories:".to_string());
            for dir in &self.directories_created {
                lines.push(format!("  - {dir}"));
            }
        }
        if self.config_written {
            lines.push("\nWrote default configuration to .worklist/config.yaml".to_string());
        }
        if self.database_initialized {
            lines.push("Database initialized at .worklist/worklist.db".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let worklist_dir = target_path.join(".worklist");

    if worklist_dir.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            directories_created: vec![],
            config_written: false,
            database_initialized: false,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    if args.force && worklist_dir.exists() {
        fs::remove_dir_all(&worklist_dir)
            .await
            .context("Failed to remove existing .worklist directory")?;
    }

    let mut directories_created = vec![];
    for dir in [worklist_dir.clone(), worklist_dir.join("logs")] {
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let relative = dir
                .strip_prefix(&target_path)
                .unwrap_or(&dir)
                .to_string_lossy()
                .to_string();
            directories_created.push(relative);
        }
    }

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize default configuration")?;
    fs::write(worklist_dir.join("config.yaml"), yaml)
        .await
        .context("Failed to write .worklist/config.yaml")?;

    let db_path = worklist_dir.join("worklist.db");
    initialize_database(&format!("sqlite:{}", db_path.display()), None)
        .await
        .context("Failed to initialize database")?;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        directories_created,
        config_written: true,
        database_initialized: true,
    };

    output(&output_data, json_mode);
    Ok(())
}
