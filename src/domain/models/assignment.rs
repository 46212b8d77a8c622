//! Assigned principals carried by a workflow list.

use serde::{Deserialize, Serialize};

use super::entity_ref::{EntityKind, EntityRef};

/// One assignment slot: a principal plus optional display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    #[serde(flatten)]
    pub entity: EntityRef,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl AssignmentEntry {
    pub fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            title: String::new(),
            comment: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// A raw, unvalidated entry as submitted by a bulk edit.
///
/// Either key may be missing; such entries are dropped by
/// [`AssignmentSet::replace_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentInput {
    #[serde(default, rename = "target_type")]
    pub kind: Option<String>,
    #[serde(default, rename = "target_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl AssignmentInput {
    pub fn new(kind: impl Into<String>, id: u64) -> Self {
        Self {
            kind: Some(kind.into()),
            id: Some(id),
            ..Default::default()
        }
    }

    /// The referenced principal, or `None` if kind or id is missing.
    pub fn entity_ref(&self) -> Option<EntityRef> {
        let kind = self.kind.as_deref().and_then(EntityKind::parse)?;
        let id = self.id.filter(|id| *id != 0)?;
        Some(EntityRef::new(kind, id))
    }

    fn into_entry(self) -> Option<AssignmentEntry> {
        let entity = self.entity_ref()?;
        Some(AssignmentEntry {
            entity,
            title: self.title.unwrap_or_default(),
            comment: self.comment.unwrap_or_default(),
        })
    }
}

impl From<AssignmentEntry> for AssignmentInput {
    fn from(entry: AssignmentEntry) -> Self {
        Self {
            kind: Some(entry.entity.kind.into()),
            id: Some(entry.entity.id),
            title: Some(entry.title),
            comment: Some(entry.comment),
        }
    }
}

/// Ordered, duplicate-free collection of assignments.
///
/// Insertion order is display order. Uniqueness is on [`EntityRef`]; adding a
/// reference that is already present keeps the existing entry untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AssignmentEntry>", into = "Vec<AssignmentEntry>")]
pub struct AssignmentSet {
    entries: Vec<AssignmentEntry>,
}

impl AssignmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an assignment. Returns `false` if the reference was already
    /// present, in which case its title and comment are kept as they were.
    pub fn add(&mut self, entity: EntityRef, title: Option<&str>, comment: Option<&str>) -> bool {
        if self.contains(&entity) {
            return false;
        }
        self.entries.push(AssignmentEntry {
            entity,
            title: title.unwrap_or_default().to_string(),
            comment: comment.unwrap_or_default().to_string(),
        });
        true
    }

    /// Remove an assignment. Returns `false` if it was not present.
    pub fn remove(&mut self, entity: &EntityRef) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.entity != entity);
        self.entries.len() != before
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.entries.iter().any(|e| &e.entity == entity)
    }

    pub fn get(&self, entity: &EntityRef) -> Option<&AssignmentEntry> {
        self.entries.iter().find(|e| &e.entity == entity)
    }

    pub fn entries(&self) -> &[AssignmentEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssignmentEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of the given kind, in insertion order.
    pub fn ids_of(&self, kind: &EntityKind) -> Vec<u64> {
        self.entries
            .iter()
            .filter(|e| &e.entity.kind == kind)
            .map(|e| e.entity.id)
            .collect()
    }

    pub fn user_ids(&self) -> Vec<u64> {
        self.ids_of(&EntityKind::User)
    }

    pub fn group_ids(&self) -> Vec<u64> {
        self.ids_of(&EntityKind::Group)
    }

    /// Replace the whole collection.
    ///
    /// Later duplicates are dropped (first occurrence wins) and entries with a
    /// missing kind or id are skipped. Returns how many inputs were dropped.
    pub fn replace_all<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = AssignmentInput>,
    {
        self.entries.clear();
        let mut dropped = 0;
        for input in inputs {
            match input.into_entry() {
                Some(entry) if !self.contains(&entry.entity) => self.entries.push(entry),
                _ => dropped += 1,
            }
        }
        dropped
    }
}

impl From<Vec<AssignmentEntry>> for AssignmentSet {
    fn from(entries: Vec<AssignmentEntry>) -> Self {
        let mut set = Self::new();
        set.replace_all(entries.into_iter().map(AssignmentInput::from));
        set
    }
}

impl From<AssignmentSet> for Vec<AssignmentEntry> {
    fn from(set: AssignmentSet) -> Self {
        set.entries
    }
}

impl<'a> IntoIterator for &'a AssignmentSet {
    type Item = &'a AssignmentEntry;
    type IntoIter = std::slice::Iter<'a, AssignmentEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
