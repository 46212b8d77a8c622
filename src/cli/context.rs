//! Wiring shared by commands: configuration, database pool and adapters.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::sqlite::{
    initialize_database, PoolConfig, SqliteContentRepository, SqliteDirectory, SqliteFieldProvisioner,
    SqliteWorkflowListRepository,
};
use crate::domain::models::Config;
use crate::infrastructure::config::{ConfigLoader, PROJECT_CONFIG_PATH};
use crate::services::{AssignmentDisplay, ContentWorkflowService, FieldReconciler, WorkflowListService};

pub type ListService = WorkflowListService<SqliteWorkflowListRepository, SqliteDirectory>;
pub type ContentService = ContentWorkflowService<
    SqliteContentRepository,
    SqliteWorkflowListRepository,
    SqliteFieldProvisioner,
    SqliteDirectory,
>;

/// Load configuration from an explicit file or the project hierarchy.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    /// Explicit `--config` file; `None` means the project hierarchy.
    pub config_path: Option<PathBuf>,
}

impl AppContext {
    /// Open the configured database, applying pending migrations.
    pub async fn open(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        let pool = initialize_database(&config.database.url(), Some(PoolConfig::from(&config.database)))
            .await
            .context("Failed to initialize database. Run 'worklist init' first.")?;
        Ok(Self {
            config,
            pool,
            config_path,
        })
    }

    /// The file settings changes are written to.
    pub fn settings_file(&self) -> &Path {
        self.config_path
            .as_deref()
            .unwrap_or_else(|| Path::new(PROJECT_CONFIG_PATH))
    }

    pub fn lists(&self) -> Arc<SqliteWorkflowListRepository> {
        Arc::new(SqliteWorkflowListRepository::new(self.pool.clone()))
    }

    pub fn directory(&self) -> Arc<SqliteDirectory> {
        Arc::new(SqliteDirectory::new(self.pool.clone()))
    }

    pub fn provisioner(&self) -> Arc<SqliteFieldProvisioner> {
        Arc::new(SqliteFieldProvisioner::new(self.pool.clone()))
    }

    pub fn list_service(&self) -> ListService {
        WorkflowListService::new(self.lists(), self.directory(), &self.config.workflow)
    }

    pub fn display(&self) -> AssignmentDisplay<SqliteDirectory> {
        AssignmentDisplay::new(self.directory(), self.config.workflow.resource_vocabulary.clone())
    }

    pub fn reconciler(&self) -> FieldReconciler<SqliteFieldProvisioner> {
        FieldReconciler::new(self.provisioner(), self.config.field.clone())
    }

    pub fn content_service(&self) -> ContentService {
        ContentWorkflowService::new(
            Arc::new(SqliteContentRepository::new(self.pool.clone())),
            self.lists(),
            self.provisioner(),
            self.directory(),
            self.config.workflow.clone(),
            self.config.field.field_name.clone(),
        )
    }
}
