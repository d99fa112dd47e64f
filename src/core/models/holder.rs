//! Holder identifiers and directory records
//!
//! A holder is anything permissions can be granted to: a user or a group.
//! Users carry the superuser flag; groups form a directed parent graph that
//! may contain cycles.

use serde::{Deserialize, Serialize};

/// User identifier assigned by the backing directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group identifier assigned by the backing directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a permission holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderRef {
    /// A user account
    User(UserId),
    /// A permission group
    Group(GroupId),
}

impl HolderRef {
    /// Whether this holder is a user.
    pub fn is_user(&self) -> bool {
        matches!(self, HolderRef::User(_))
    }
}

impl From<UserId> for HolderRef {
    fn from(id: UserId) -> Self {
        HolderRef::User(id)
    }
}

impl From<GroupId> for HolderRef {
    fn from(id: GroupId) -> Self {
        HolderRef::Group(id)
    }
}

impl std::fmt::Display for HolderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HolderRef::User(id) => write!(f, "user {}", id),
            HolderRef::Group(id) => write!(f, "group {}", id),
        }
    }
}

/// User record as seen by the permission system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User identifier
    pub id: UserId,
    /// Username (unique)
    pub username: String,
    /// Superusers pass every permission check
    pub is_superuser: bool,
}

/// Group record as seen by the permission system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group identifier
    pub id: GroupId,
    /// Codename (unique)
    pub codename: String,
    /// Human-readable name
    pub name: Option<String>,
}
