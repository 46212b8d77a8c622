//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - WorkflowListRepository: persistence of workflow lists
//! - EntityResolver: display labels for principals and resource tags
//! - FieldProvisioner: the host's field storage, attachments and displays
//! - ContentRepository: content items and their workflow reference

pub mod content_repository;
pub mod entity_resolver;
pub mod field_provisioner;
pub mod workflow_list_repository;

pub use content_repository::ContentRepository;
pub use entity_resolver::{EntityResolver, ResolvedEntity};
pub use field_provisioner::FieldProvisioner;
pub use workflow_list_repository::WorkflowListRepository;
