//! Field provisioner port.
//!
//! Narrow interface onto the host's field subsystem: one shared storage
//! definition, per-content-type attachments, and display components.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ContentType, DisplayComponent, DisplayMode, FieldDefaults, FieldStorageSpec};

#[async_trait]
pub trait FieldProvisioner: Send + Sync {
    /// Create the storage definition if it is absent. Never recreates an
    /// existing one. Returns `true` if it was created by this call.
    async fn ensure_storage(&self, spec: &FieldStorageSpec) -> DomainResult<bool>;

    /// All content types known to the host.
    async fn content_types(&self) -> DomainResult<Vec<ContentType>>;

    /// Content types that currently carry the field.
    async fn list_attached(&self, field_name: &str) -> DomainResult<BTreeSet<String>>;

    /// Attach the field to a content type, bound to the shared storage.
    async fn attach(&self, field_name: &str, content_type: &str, defaults: &FieldDefaults) -> DomainResult<()>;

    /// Remove the field from a content type, along with its display components.
    async fn detach(&self, field_name: &str, content_type: &str) -> DomainResult<()>;

    /// Whether a display object of this mode exists for the content type.
    async fn display_exists(&self, content_type: &str, mode: DisplayMode) -> DomainResult<bool>;

    /// Place the field on an existing display.
    async fn set_display_component(
        &self,
        content_type: &str,
        mode: DisplayMode,
        field_name: &str,
        component: &DisplayComponent,
    ) -> DomainResult<()>;
}
