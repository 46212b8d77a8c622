//! worklist - workflow lists for content
//!
//! A workflow list bundles assigned users and groups with tag-based resource
//! locations. Content items point at one workflow list through a field that is
//! attached to every enabled content type.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the port traits
//! - **Service Layer** (`services`): list administration, field reconciliation,
//!   content assignment and display resolution
//! - **Adapters** (`adapters`): SQLite implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//! use worklist::adapters::sqlite::{initialize_database, SqliteFieldProvisioner};
//! use worklist::domain::models::FieldSettings;
//! use worklist::services::FieldReconciler;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = initialize_database("sqlite:.worklist/worklist.db", None).await?;
//! let reconciler = FieldReconciler::new(
//!     Arc::new(SqliteFieldProvisioner::new(pool)),
//!     FieldSettings::default(),
//! );
//! let desired: BTreeSet<String> = ["page".to_string()].into();
//! let report = reconciler.reconcile(&desired).await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AssignableKinds, AssignmentEntry, AssignmentInput, AssignmentSet, Config, EntityKind, EntityRef,
    ReconcileReport, ResourceTagSet, WorkflowList, WorkflowSettings,
};
pub use domain::ports::{ContentRepository, EntityResolver, FieldProvisioner, WorkflowListRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ContentWorkflowService, FieldReconciler, WorkflowListService};
