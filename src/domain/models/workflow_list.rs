//! Workflow list aggregate.
//!
//! A workflow list is a named bundle of assigned principals and resource
//! location tags that editors attach to content. It is not a state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::{AssignmentInput, AssignmentSet};
use super::entity_ref::EntityRef;
use super::resource_tags::ResourceTagSet;

/// Maximum length of a machine name.
pub const MAX_MACHINE_NAME_LEN: usize = 64;

/// Maximum length of a label.
pub const MAX_LABEL_LEN: usize = 255;

/// Outcome of a repository save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Created,
    Updated,
}

/// Check that `id` is a valid machine name: lowercase ASCII letters, digits
/// and underscores, not starting with a digit.
pub fn validate_machine_name(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Machine name cannot be empty".to_string());
    }
    if id.len() > MAX_MACHINE_NAME_LEN {
        return Err(format!(
            "Machine name cannot exceed {MAX_MACHINE_NAME_LEN} characters"
        ));
    }
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!("Machine name '{id}' cannot start with a digit"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!(
            "Machine name '{id}' may only contain lowercase letters, digits and underscores"
        ));
    }
    Ok(())
}

/// A named list of assigned principals and resource tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowList {
    id: String,
    label: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "assigned_entities")]
    assignments: AssignmentSet,
    #[serde(default, rename = "resource_tags")]
    tags: ResourceTagSet,
    #[serde(rename = "created")]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "changed")]
    changed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    dirty: bool,
}

impl WorkflowList {
    /// Create a new, never-persisted list.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            assignments: AssignmentSet::new(),
            tags: ResourceTagSet::new(),
            created_at: None,
            changed_at: None,
            dirty: true,
        }
    }

    /// Rebuild a list from its persisted parts.
    pub fn restore(
        id: String,
        label: String,
        description: String,
        assignments: AssignmentSet,
        tags: ResourceTagSet,
        created_at: DateTime<Utc>,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            label,
            description,
            assignments,
            tags,
            created_at: Some(created_at),
            changed_at: Some(changed_at.max(created_at)),
            dirty: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(description);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn assignments(&self) -> &AssignmentSet {
        &self.assignments
    }

    pub fn tags(&self) -> &ResourceTagSet {
        &self.tags
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn changed_at(&self) -> Option<DateTime<Utc>> {
        self.changed_at
    }

    /// True until the first successful save.
    pub fn is_new(&self) -> bool {
        self.created_at.is_none()
    }

    /// True if there are mutations not yet persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by a repository once a write has succeeded.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.dirty = true;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.dirty = true;
    }

    /// Replace all assignments. Returns how many inputs were dropped as
    /// malformed or duplicate.
    pub fn set_assignments<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = AssignmentInput>,
    {
        self.dirty = true;
        self.assignments.replace_all(inputs)
    }

    pub fn set_tags<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = u64>,
    {
        self.dirty = true;
        self.tags.replace_all(ids);
    }

    pub fn add_assignment(&mut self, entity: EntityRef, title: Option<&str>, comment: Option<&str>) -> bool {
        let added = self.assignments.add(entity, title, comment);
        self.dirty |= added;
        added
    }

    pub fn remove_assignment(&mut self, entity: &EntityRef) -> bool {
        let removed = self.assignments.remove(entity);
        self.dirty |= removed;
        removed
    }

    pub fn add_tag(&mut self, tag_id: u64) -> bool {
        let added = self.tags.add(tag_id);
        self.dirty |= added;
        added
    }

    pub fn remove_tag(&mut self, tag_id: u64) -> bool {
        let removed = self.tags.remove(tag_id);
        self.dirty |= removed;
        removed
    }

    /// Pre-save hook, invoked by the repository immediately before writing.
    ///
    /// Sets `created_at` only when `is_new`, and always moves `changed_at` to
    /// `now`, never earlier than `created_at`. Repeating the call with the same
    /// arguments leaves the record unchanged.
    pub fn on_before_persist(&mut self, is_new: bool, now: DateTime<Utc>) {
        if is_new {
            self.created_at = Some(now);
        }
        self.changed_at = Some(match self.created_at {
            Some(created) => now.max(created),
            None => now,
        });
    }

    /// Validate fields an admin can edit.
    pub fn validate(&self) -> Result<(), String> {
        validate_machine_name(&self.id)?;
        if self.label.trim().is_empty() {
            return Err("Workflow list label cannot be empty".to_string());
        }
        if self.label.chars().count() > MAX_LABEL_LEN {
            return Err(format!(
                "Workflow list label cannot exceed {MAX_LABEL_LEN} characters"
            ));
        }
        Ok(())
    }
}
