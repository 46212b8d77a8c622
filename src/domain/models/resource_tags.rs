//! Resource location tags attached to a workflow list.

use serde::{Deserialize, Serialize};

/// Ordered set of tag (taxonomy term) ids.
///
/// Order carries no meaning but is kept stable for display. Zero is never a
/// valid tag id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct ResourceTagSet {
    ids: Vec<u64>,
}

impl ResourceTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Returns `false` for a duplicate or a zero id.
    pub fn add(&mut self, tag_id: u64) -> bool {
        if tag_id == 0 || self.contains(tag_id) {
            return false;
        }
        self.ids.push(tag_id);
        true
    }

    /// Remove a tag. Returns `false` if it was not present.
    pub fn remove(&mut self, tag_id: u64) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| *id != tag_id);
        self.ids.len() != before
    }

    pub fn contains(&self, tag_id: u64) -> bool {
        self.ids.contains(&tag_id)
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Replace all tags, dropping duplicates and zero ids.
    pub fn replace_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = u64>,
    {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }
}

impl From<Vec<u64>> for ResourceTagSet {
    fn from(ids: Vec<u64>) -> Self {
        let mut set = Self::new();
        set.replace_all(ids);
        set
    }
}

impl From<ResourceTagSet> for Vec<u64> {
    fn from(set: ResourceTagSet) -> Self {
        set.ids
    }
}
