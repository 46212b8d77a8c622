use anyhow::{anyhow, Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::validate_machine_name;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid field name '{0}': {1}")]
    InvalidFieldName(String, String),

    #[error("Resource vocabulary cannot be empty")]
    EmptyVocabulary,

    #[error("Invalid enabled content type: {0}")]
    InvalidContentType(String),
}

/// Project configuration written by `worklist init`.
pub const PROJECT_CONFIG_PATH: &str = ".worklist/config.yaml";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .worklist/config.yaml (project config, created by init)
    /// 3. .worklist/local.yaml (local overrides, optional)
    /// 4. Environment variables (WORKLIST_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(PROJECT_CONFIG_PATH))
            .merge(Yaml::file(".worklist/local.yaml"))
            .merge(Env::prefixed("WORKLIST_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("WORKLIST_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Store `workflow.enabled_content_types` in a YAML config file.
    ///
    /// Every other key in the file is kept as written; the file is created
    /// if it does not exist yet.
    pub fn write_enabled_content_types(path: impl AsRef<Path>, content_types: &[String]) -> Result<()> {
        let path = path.as_ref();

        let mut document = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Value::Null
        };
        if document.is_null() {
            document = Value::Mapping(Mapping::new());
        }

        let root = document
            .as_mapping_mut()
            .ok_or_else(|| anyhow!("{} is not a YAML mapping", path.display()))?;
        if !matches!(root.get("workflow"), Some(Value::Mapping(_))) {
            root.insert(Value::from("workflow"), Value::Mapping(Mapping::new()));
        }
        let workflow = root
            .get_mut("workflow")
            .and_then(Value::as_mapping_mut)
            .ok_or_else(|| anyhow!("workflow section in {} is not a mapping", path.display()))?;
        workflow.insert(
            Value::from("enabled_content_types"),
            serde_yaml::to_value(content_types).context("Failed to serialize content types")?,
        );

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(&document).context("Failed to serialize configuration")?;
        std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        validate_machine_name(&config.field.field_name)
            .map_err(|e| ConfigError::InvalidFieldName(config.field.field_name.clone(), e))?;

        if config.workflow.resource_vocabulary.trim().is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }

        let mut seen = HashSet::new();
        for content_type in &config.workflow.enabled_content_types {
            if content_type.trim().is_empty() {
                return Err(ConfigError::InvalidContentType("empty id".to_string()));
            }
            if !seen.insert(content_type.as_str()) {
                return Err(ConfigError::InvalidContentType(format!(
                    "'{content_type}' listed more than once"
                )));
            }
        }

        Ok(())
    }
}
