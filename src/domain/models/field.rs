//! Content-type field attachment models and reconciliation results.

use serde::{Deserialize, Serialize};

/// A content type known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub id: String,
    pub label: String,
}

impl ContentType {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Shared storage definition for the workflow field.
///
/// Created once and shared by every per-content-type attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStorageSpec {
    pub field_name: String,
    /// Entity type that carries the field (content items).
    pub entity_type: String,
    /// Entity type the field references.
    pub target_type: String,
    pub cardinality: u32,
}

/// Per-attachment settings applied when a field is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefaults {
    pub label: String,
    pub description: String,
    pub required: bool,
}

/// Which display of a content type a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Form,
    View,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::View => "view",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "form" => Some(Self::Form),
            "view" => Some(Self::View),
            _ => None,
        }
    }
}

/// Widget (form) or formatter (view) configuration for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayComponent {
    /// Widget or formatter plugin id.
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub weight: i32,
    /// Label placement for view formatters (`above`, `inline`, `hidden`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// What happened to one display while attaching a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum DisplayStatus {
    Configured,
    /// The content type has no display object of this mode; left alone.
    NoDisplay,
    Failed(String),
}

/// What the reconciler did for one content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconcileAction {
    Attached {
        form_display: DisplayStatus,
        view_display: DisplayStatus,
    },
    Detached,
    AttachFailed { error: String },
    DetachFailed { error: String },
    /// Desired but not a content type the host knows about.
    SkippedUnknown,
}

impl ReconcileAction {
    pub fn is_failure(&self) -> bool {
        match self {
            Self::AttachFailed { .. } | Self::DetachFailed { .. } => true,
            Self::Attached {
                form_display,
                view_display,
            } => {
                matches!(form_display, DisplayStatus::Failed(_))
                    || matches!(view_display, DisplayStatus::Failed(_))
            }
            Self::Detached | Self::SkippedUnknown => false,
        }
    }
}

/// Per-content-type result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentTypeOutcome {
    pub content_type: String,
    #[serde(flatten)]
    pub action: ReconcileAction,
}

/// Result of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub field_name: String,
    /// Whether the shared storage had to be created on this run.
    pub storage_created: bool,
    pub outcomes: Vec<ContentTypeOutcome>,
    /// Content types that were already correct and left untouched.
    pub unchanged: Vec<String>,
}

impl ReconcileReport {
    fn with_action(&self, pred: impl Fn(&ReconcileAction) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| pred(&o.action))
            .map(|o| o.content_type.as_str())
            .collect()
    }

    pub fn attached(&self) -> Vec<&str> {
        self.with_action(|a| matches!(a, ReconcileAction::Attached { .. }))
    }

    pub fn detached(&self) -> Vec<&str> {
        self.with_action(|a| matches!(a, ReconcileAction::Detached))
    }

    pub fn failures(&self) -> Vec<&ContentTypeOutcome> {
        self.outcomes.iter().filter(|o| o.action.is_failure()).collect()
    }

    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.storage_created
            || self.outcomes.iter().any(|o| {
                matches!(
                    o.action,
                    ReconcileAction::Attached { .. } | ReconcileAction::Detached
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(ct: &str, action: ReconcileAction) -> ContentTypeOutcome {
        ContentTypeOutcome {
            content_type: ct.to_string(),
            action,
        }
    }

    #[test]
    fn test_display_failure_counts_as_failure() {
        let action = ReconcileAction::Attached {
            form_display: DisplayStatus::Configured,
            view_display: DisplayStatus::Failed("locked".into()),
        };
        assert!(action.is_failure());

        let skipped = ReconcileAction::Attached {
            form_display: DisplayStatus::NoDisplay,
            view_display: DisplayStatus::NoDisplay,
        };
        assert!(!skipped.is_failure());
    }

    #[test]
    fn test_report_partitions() {
        let report = ReconcileReport {
            field_name: "field_workflow_list".into(),
            storage_created: false,
            outcomes: vec![
                outcome(
                    "article",
                    ReconcileAction::Attached {
                        form_display: DisplayStatus::Configured,
                        view_display: DisplayStatus::Configured,
                    },
                ),
                outcome("event", ReconcileAction::Detached),
                outcome("page", ReconcileAction::DetachFailed { error: "boom".into() }),
            ],
            unchanged: vec!["topic".into()],
        };

        assert_eq!(report.attached(), vec!["article"]);
        assert_eq!(report.detached(), vec!["event"]);
        assert_eq!(report.failures().len(), 1);
        assert!(!report.is_success());
        assert!(report.has_changes());
    }

    #[test]
    fn test_empty_report_has_no_changes() {
        let report = ReconcileReport::default();
        assert!(report.is_success());
        assert!(!report.has_changes());
    }

    #[test]
    fn test_display_mode_parse() {
        assert_eq!(DisplayMode::from_str("FORM"), Some(DisplayMode::Form));
        assert_eq!(DisplayMode::from_str("teaser"), None);
    }
}
