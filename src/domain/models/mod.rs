pub mod assignment;
pub mod config;
pub mod content;
pub mod entity_ref;
pub mod field;
pub mod resource_tags;
pub mod workflow_list;

pub use assignment::{AssignmentEntry, AssignmentInput, AssignmentSet};
pub use config::{Config, DatabaseConfig, FieldSettings, LoggingConfig, WorkflowSettings};
pub use content::{
    ContentItem, ContentWorkflowView, ListSummary, ResolvedAssignment, ResolvedTag, WorkflowListView,
};
pub use entity_ref::{AssignableKinds, EntityKind, EntityRef, OtherKind};
pub use field::{
    ContentType, ContentTypeOutcome, DisplayComponent, DisplayMode, DisplayStatus, FieldDefaults,
    FieldStorageSpec, ReconcileAction, ReconcileReport,
};
pub use resource_tags::ResourceTagSet;
pub use workflow_list::{validate_machine_name, SaveStatus, WorkflowList};
