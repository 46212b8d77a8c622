use serde::{Deserialize, Serialize};

use super::entity_ref::AssignableKinds;
use super::field::{DisplayComponent, FieldDefaults, FieldStorageSpec};

/// Main configuration structure for worklist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Workflow list settings (enabled content types, vocabulary, kinds)
    #[serde(default)]
    pub workflow: WorkflowSettings,

    /// Workflow field provisioning defaults
    #[serde(default)]
    pub field: FieldSettings,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".worklist/worklist.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    /// `sqlx` connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file logs: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Admin settings for workflow lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkflowSettings {
    /// Content types that carry the workflow field
    #[serde(default)]
    pub enabled_content_types: Vec<String>,

    /// Vocabulary holding resource location terms
    #[serde(default = "default_resource_vocabulary")]
    pub resource_vocabulary: String,

    /// Whether groups may be assigned in addition to users
    #[serde(default)]
    pub group_kind_enabled: bool,
}

fn default_resource_vocabulary() -> String {
    "resource_locations".to_string()
}

impl WorkflowSettings {
    pub fn is_enabled(&self, content_type: &str) -> bool {
        self.enabled_content_types.iter().any(|t| t == content_type)
    }

    pub fn assignable_kinds(&self) -> AssignableKinds {
        AssignableKinds::new(self.group_kind_enabled)
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            enabled_content_types: vec![],
            resource_vocabulary: default_resource_vocabulary(),
            group_kind_enabled: false,
        }
    }
}

/// Definition of the workflow field attached to enabled content types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FieldSettings {
    #[serde(default = "default_field_name")]
    pub field_name: String,

    #[serde(default = "default_field_label")]
    pub label: String,

    #[serde(default = "default_field_description")]
    pub description: String,

    /// Widget placed on the default form display
    #[serde(default = "default_form_widget")]
    pub form_widget: DisplayComponent,

    /// Formatter placed on the default view display
    #[serde(default = "default_view_formatter")]
    pub view_formatter: DisplayComponent,
}

fn default_field_name() -> String {
    "field_workflow_list".to_string()
}

fn default_field_label() -> String {
    "Workflow List".to_string()
}

fn default_field_description() -> String {
    "Assign a workflow list to this content.".to_string()
}

fn default_form_widget() -> DisplayComponent {
    DisplayComponent {
        component_type: "options_select".to_string(),
        weight: 10,
        label: None,
    }
}

fn default_view_formatter() -> DisplayComponent {
    DisplayComponent {
        component_type: "entity_reference_label".to_string(),
        weight: 10,
        label: Some("above".to_string()),
    }
}

impl FieldSettings {
    /// Shared storage: single-valued reference from content to a workflow list.
    pub fn storage_spec(&self) -> FieldStorageSpec {
        FieldStorageSpec {
            field_name: self.field_name.clone(),
            entity_type: "content".to_string(),
            target_type: "workflow_list".to_string(),
            cardinality: 1,
        }
    }

    pub fn defaults(&self) -> FieldDefaults {
        FieldDefaults {
            label: self.label.clone(),
            description: self.description.clone(),
            required: false,
        }
    }
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            field_name: default_field_name(),
            label: default_field_label(),
            description: default_field_description(),
            form_widget: default_form_widget(),
            view_formatter: default_view_formatter(),
        }
    }
}
