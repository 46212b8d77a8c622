//! Command-line interface for worklist.

pub mod commands;
pub mod context;
pub mod display;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use commands::{
    content::ContentArgs, directory::DirectoryArgs, init::InitArgs, list::ListArgs, settings::SettingsArgs,
};
use context::{load_config, AppContext};

#[derive(Parser, Debug)]
#[command(name = "worklist")]
#[command(about = "Workflow lists: assign people, groups and resources to content", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .worklist/config.yaml plus overrides)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize worklist configuration and database
    Init(InitArgs),
    /// Manage workflow lists
    List(ListArgs),
    /// Inspect and apply workflow settings
    Settings(SettingsArgs),
    /// Assign workflow lists to content
    Content(ContentArgs),
    /// Seed users, groups, terms and content types
    Directory(DirectoryArgs),
}

/// Run a parsed command line.
///
/// Every command except `init` loads configuration, installs the logger and
/// opens the database first.
pub async fn run(cli: Cli) -> Result<()> {
    let json_mode = cli.json;
    let command = match cli.command {
        Commands::Init(args) => return commands::init::execute(args, json_mode).await,
        command => command,
    };

    let config = load_config(cli.config.as_deref())?;
    let _logger = LoggerImpl::init(&LogConfig::try_from(&config.logging)?)?;
    let ctx = AppContext::open(config, cli.config).await?;

    match command {
        Commands::Init(_) => Ok(()),
        Commands::List(args) => commands::list::execute(args, &ctx, json_mode).await,
        Commands::Settings(args) => commands::settings::execute(args, &ctx, json_mode).await,
        Commands::Content(args) => commands::content::execute(args, &ctx, json_mode).await,
        Commands::Directory(args) => commands::directory::execute(args, &ctx, json_mode).await,
    }
}

/// Print an error in the selected output mode and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }
    std::process::exit(1);
}
