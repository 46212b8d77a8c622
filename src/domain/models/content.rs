//! Content items and the display views built around them.

use serde::{Deserialize, Serialize};

use super::entity_ref::EntityKind;

/// A content item as seen through the content store.
///
/// `workflow_id` is a loose reference to a workflow list; the list may have
/// been deleted since it was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    pub content_type: String,
    pub title: String,
    pub workflow_id: Option<String>,
}

/// An assignment resolved to a displayable principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAssignment {
    pub kind: EntityKind,
    pub id: u64,
    pub label: String,
    pub title: String,
    pub comment: String,
}

/// A resource tag resolved to its term name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTag {
    pub id: u64,
    pub name: String,
}

/// A workflow list with every assignment and tag resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowListView {
    pub id: String,
    pub label: String,
    pub description: String,
    pub assignments: Vec<ResolvedAssignment>,
    pub resources: Vec<ResolvedTag>,
    pub summary: ListSummary,
}

/// What an editor sees on a content item's workflow tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentWorkflowView {
    pub content: ContentItem,
    /// `None` when no list is assigned or the assigned list no longer exists.
    pub workflow: Option<WorkflowListView>,
}

/// Counts shown in a workflow list overview row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub users: usize,
    pub groups: usize,
    pub resources: usize,
}

impl ListSummary {
    /// "2 users, 1 group" or "None".
    pub fn assigned_text(&self) -> String {
        let mut parts = Vec::new();
        if self.users > 0 {
            parts.push(plural(self.users, "user", "users"));
        }
        if self.groups > 0 {
            parts.push(plural(self.groups, "group", "groups"));
        }
        if parts.is_empty() {
            "None".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// "3 resources" or "None".
    pub fn resources_text(&self) -> String {
        if self.resources == 0 {
            "None".to_string()
        } else {
            plural(self.resources, "resource", "resources")
        }
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}
