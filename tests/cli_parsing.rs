//! Command-line parsing for the worklist binary.

use clap::Parser;
use std::path::PathBuf;
use worklist::cli::commands::content::ContentCommands;
use worklist::cli::commands::directory::DirectoryCommands;
use worklist::cli::commands::list::ListCommands;
use worklist::cli::{Cli, Commands};
use worklist::domain::models::{DisplayMode, EntityRef};

#[test]
fn test_quick_edit_collects_repeated_flags() {
    let cli = Cli::try_parse_from([
        "worklist", "list", "quick-edit", "editorial", "--entry", "user:1", "-e", "group:2", "--tag", "10",
        "-t", "11",
    ])
    .unwrap();

    match cli.command {
        Commands::List(args) => match args.command {
            ListCommands::QuickEdit { id, entries, tags } => {
                assert_eq!(id, "editorial");
                assert_eq!(entries, vec!["user:1", "group:2"]);
                assert_eq!(tags, vec![10, 11]);
            }
            other => panic!("unexpected list command: {other:?}"),
        },
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_unassign_parses_entity_ref() {
    let cli = Cli::try_parse_from(["worklist", "list", "unassign", "editorial", "user:7"]).unwrap();
    match cli.command {
        Commands::List(args) => match args.command {
            ListCommands::Unassign { entity, .. } => assert_eq!(entity, EntityRef::user(7)),
            other => panic!("unexpected list command: {other:?}"),
        },
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_tag_rejects_non_numeric_id() {
    assert!(Cli::try_parse_from(["worklist", "list", "tag", "editorial", "studio"]).is_err());
}

#[test]
fn test_directory_add_display_mode() {
    let cli = Cli::try_parse_from(["worklist", "directory", "add-display", "page", "View"]).unwrap();
    match cli.command {
        Commands::Directory(args) => match args.command {
            DirectoryCommands::AddDisplay { content_type, mode } => {
                assert_eq!(content_type, "page");
                assert_eq!(mode, DisplayMode::View);
            }
            other => panic!("unexpected directory command: {other:?}"),
        },
        other => panic!("unexpected command: {other:?}"),
    }

    assert!(Cli::try_parse_from(["worklist", "directory", "add-display", "page", "teaser"]).is_err());
}

#[test]
fn test_content_assign_with_config_override() {
    let cli = Cli::try_parse_from([
        "worklist", "--config", "site.yaml", "content", "assign", "4", "editorial",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("site.yaml")));
    match cli.command {
        Commands::Content(args) => match args.command {
            ContentCommands::Assign { id, workflow } => {
                assert_eq!(id, 4);
                assert_eq!(workflow, "editorial");
            }
            other => panic!("unexpected content command: {other:?}"),
        },
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_init_force_flag() {
    let cli = Cli::try_parse_from(["worklist", "init", "--force", "/tmp/site"]).unwrap();
    match cli.command {
        Commands::Init(args) => {
            assert!(args.force);
            assert_eq!(args.path, PathBuf::from("/tmp/site"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
