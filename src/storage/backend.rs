//! The persistence seam

use std::collections::HashSet;

use crate::core::keys::{PermKey, PermKind};
use crate::core::models::{GroupId, HolderRef, Perm, PermId, UserId};
use crate::utils::error::Result;

/// Storage backend for permission rows, grants and the holder directory.
///
/// Implementations must enforce uniqueness over the full permission key:
/// `insert_perm` fails with `Conflict` when a row with the same key already
/// exists. Grant operations referencing an unknown holder or permission fail
/// with `NotFound`.
#[async_trait::async_trait]
pub trait PermBackend: Send + Sync {
    /// Insert a new permission row, failing with `Conflict` on a duplicate key.
    async fn insert_perm(&self, key: &PermKey, name: Option<String>) -> Result<Perm>;

    /// Look up a permission row by exact key.
    async fn find_perm(&self, key: &PermKey) -> Result<Option<Perm>>;

    /// Look up a permission row by id.
    async fn perm_by_id(&self, id: PermId) -> Result<Option<Perm>>;

    /// All permission rows, in unspecified order.
    async fn list_perms(&self) -> Result<Vec<Perm>>;

    /// All permission rows of one kind, in unspecified order.
    async fn list_perms_by_kind(&self, kind: PermKind) -> Result<Vec<Perm>>;

    /// Delete a permission row and every grant referencing it.
    ///
    /// Returns whether the row existed.
    async fn delete_perm(&self, id: PermId) -> Result<bool>;

    /// Insert a direct grant. Returns false if the grant was already present.
    async fn add_grant(&self, holder: HolderRef, perm: PermId) -> Result<bool>;

    /// Remove a direct grant. Returns false if the grant was not present.
    async fn remove_grant(&self, holder: HolderRef, perm: PermId) -> Result<bool>;

    /// Remove every direct grant of a holder, returning how many were removed.
    async fn clear_grants(&self, holder: HolderRef) -> Result<u64>;

    /// The holder's direct grants.
    async fn direct_grants(&self, holder: HolderRef) -> Result<HashSet<PermId>>;

    /// Whether the user carries the superuser flag.
    async fn is_superuser(&self, user: UserId) -> Result<bool>;

    /// Groups the user directly belongs to.
    async fn user_groups(&self, user: UserId) -> Result<Vec<GroupId>>;

    /// Direct parent groups of a group.
    async fn group_parents(&self, group: GroupId) -> Result<Vec<GroupId>>;
}
