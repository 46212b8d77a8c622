//! Polymorphic references to assignable principals.
//!
//! An assignment points at a principal by `(kind, id)`. The kind is an open
//! enum: `user` and `group` are known, anything else is carried verbatim so
//! stored records with other principal kinds survive a load/save cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of principal an assignment points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    User,
    Group,
    Other(OtherKind),
}

/// Name of a principal kind other than `user` or `group`.
///
/// Only built through `EntityKind::from`, so it never holds a known kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OtherKind(String);

impl OtherKind {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EntityKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Other(kind) => kind.as_str(),
        }
    }

    /// Parse a kind, returning `None` for a blank string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        Some(Self::from(s.to_string()))
    }

    /// Human label used when listing kind options.
    pub fn label(&self) -> String {
        match self {
            Self::User => "User".to_string(),
            Self::Group => "Group".to_string(),
            Self::Other(kind) => {
                let mut chars = kind.as_str().chars();
                chars
                    .next()
                    .map(|c| c.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            }
        }
    }
}

impl From<String> for EntityKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => Self::User,
            "group" => Self::Group,
            _ => Self::Other(OtherKind(s)),
        }
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Other(OtherKind(kind)) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to one principal: `(kind, id)`.
///
/// Serialized with the `target_type` / `target_id` keys used by the
/// persisted `assigned_entities` array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "target_type")]
    pub kind: EntityKind,
    #[serde(rename = "target_id")]
    pub id: u64,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn user(id: u64) -> Self {
        Self::new(EntityKind::User, id)
    }

    pub fn group(id: u64) -> Self {
        Self::new(EntityKind::Group, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl std::str::FromStr for EntityRef {
    type Err = String;

    /// Parse `kind:id`, e.g. `user:5` or `group:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected <kind>:<id>, got '{s}'"))?;
        let kind = EntityKind::parse(kind).ok_or_else(|| format!("Missing kind in '{s}'"))?;
        let id: u64 = id
            .trim()
            .parse()
            .map_err(|_| format!("Invalid id in '{s}'"))?;
        if id == 0 {
            return Err(format!("Invalid id in '{s}'"));
        }
        Ok(Self::new(kind, id))
    }
}

/// Principal kinds an editor may assign.
///
/// Group assignments depend on an optional group directory being present in
/// the host; that is expressed as a capability flag rather than probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignableKinds {
    groups_enabled: bool,
}

impl AssignableKinds {
    pub const fn new(groups_enabled: bool) -> Self {
        Self { groups_enabled }
    }

    pub const fn users_only() -> Self {
        Self::new(false)
    }

    pub const fn groups_enabled(&self) -> bool {
        self.groups_enabled
    }

    pub fn allows(&self, kind: &EntityKind) -> bool {
        match kind {
            EntityKind::User => true,
            EntityKind::Group => self.groups_enabled,
            EntityKind::Other(_) => false,
        }
    }

    /// `(kind, label)` pairs for a kind selector.
    pub fn options(&self) -> Vec<(EntityKind, String)> {
        let mut options = vec![(EntityKind::User, EntityKind::User.label())];
        if self.groups_enabled {
            options.push((EntityKind::Group, EntityKind::Group.label()));
        }
        options
    }
}

impl Default for AssignableKinds {
    fn default() -> Self {
        Self::users_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_string() {
        assert_eq!(EntityKind::from("user".to_string()), EntityKind::User);
        assert_eq!(EntityKind::from("group".to_string()), EntityKind::Group);
        let team = EntityKind::from("team".to_string());
        assert!(matches!(&team, EntityKind::Other(kind) if kind.as_str() == "team"));
        assert_eq!(String::from(team), "team");
    }

    #[test]
    fn test_blank_kind_is_missing() {
        assert!(EntityKind::parse("  ").is_none());
        assert_eq!(EntityKind::parse(" group "), Some(EntityKind::Group));
    }

    #[test]
    fn test_entity_ref_serializes_with_target_keys() {
        let json = serde_json::to_value(EntityRef::group(2)).unwrap();
        assert_eq!(json, serde_json::json!({"target_type": "group", "target_id": 2}));
    }

    #[test]
    fn test_entity_ref_parse() {
        let r: EntityRef = "user:5".parse().unwrap();
        assert_eq!(r, EntityRef::user(5));
        assert!("user".parse::<EntityRef>().is_err());
        assert!("user:0".parse::<EntityRef>().is_err());
        assert!(":5".parse::<EntityRef>().is_err());
        assert!("user:abc".parse::<EntityRef>().is_err());
    }

    #[test]
    fn test_assignable_kinds_group_capability() {
        let users = AssignableKinds::users_only();
        assert!(users.allows(&EntityKind::User));
        assert!(!users.allows(&EntityKind::Group));
        assert_eq!(users.options().len(), 1);

        let both = AssignableKinds::new(true);
        assert!(both.allows(&EntityKind::Group));
        assert!(!both.allows(&EntityKind::from("team".to_string())));
        let labels: Vec<String> = both.options().into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["User", "Group"]);
    }

    #[test]
    fn test_other_kind_label_is_capitalized() {
        assert_eq!(EntityKind::from("team".to_string()).label(), "Team");
    }

    #[test]
    fn test_known_kind_names_never_become_other() {
        let user: EntityKind = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(user, EntityKind::User);
        assert_eq!(EntityKind::parse("group"), Some(EntityKind::Group));

        let mut set = crate::domain::models::AssignmentSet::new();
        assert!(set.add(EntityRef::user(1), None, None));
        assert!(!set.add(EntityRef::new(EntityKind::from("user".to_string()), 1), None, None));
        assert_eq!(set.len(), 1);
    }
}
