//! Application services built on the domain ports.

pub mod assignment_display;
pub mod content_workflow_service;
pub mod field_reconciler;
pub mod workflow_list_service;

pub use assignment_display::{summarize, AssignmentDisplay};
pub use content_workflow_service::ContentWorkflowService;
pub use field_reconciler::FieldReconciler;
pub use workflow_list_service::WorkflowListService;
