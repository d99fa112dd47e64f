//! In-memory reference backend

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::core::keys::{PermKey, PermKind, format_key};
use crate::core::models::{GroupId, GroupRecord, HolderRef, Perm, PermId, UserId, UserRecord};
use crate::storage::backend::PermBackend;
use crate::utils::error::{PermError, Result};

#[derive(Debug, Default)]
struct MemoryState {
    perms: HashMap<PermId, Perm>,
    perm_index: HashMap<PermKey, PermId>,
    grants: HashMap<HolderRef, HashSet<PermId>>,
    users: HashMap<UserId, UserRecord>,
    groups: HashMap<GroupId, GroupRecord>,
    memberships: HashMap<UserId, HashSet<GroupId>>,
    parents: HashMap<GroupId, HashSet<GroupId>>,
    next_perm_id: i64,
    next_user_id: i64,
    next_group_id: i64,
}

impl MemoryState {
    fn check_user(&self, user: UserId) -> Result<()> {
        if self.users.contains_key(&user) {
            Ok(())
        } else {
            Err(PermError::not_found(format!("user {} not found", user)))
        }
    }

    fn check_group(&self, group: GroupId) -> Result<()> {
        if self.groups.contains_key(&group) {
            Ok(())
        } else {
            Err(PermError::not_found(format!("group {} not found", group)))
        }
    }

    fn check_holder(&self, holder: HolderRef) -> Result<()> {
        match holder {
            HolderRef::User(id) => self.check_user(id),
            HolderRef::Group(id) => self.check_group(id),
        }
    }

    fn check_perm(&self, id: PermId) -> Result<()> {
        if self.perms.contains_key(&id) {
            Ok(())
        } else {
            Err(PermError::not_found(format!("permission {} not found", id)))
        }
    }
}

/// Reference backend holding everything behind a single `RwLock`.
///
/// Ships for tests and embedders that do not need durable storage. Besides
/// the [`PermBackend`] contract it provides the directory mutators used to
/// seed users, groups and memberships.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    async fn insert_user(&self, username: &str, is_superuser: bool) -> Result<UserRecord> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == username) {
            return Err(PermError::conflict(format!(
                "user {:?} already exists",
                username
            )));
        }
        state.next_user_id += 1;
        let record = UserRecord {
            id: UserId(state.next_user_id),
            username: username.to_string(),
            is_superuser,
        };
        state.users.insert(record.id, record.clone());
        debug!("Created user {} ({})", record.id, record.username);
        Ok(record)
    }

    /// Create a regular user.
    pub async fn create_user(&self, username: &str) -> Result<UserRecord> {
        self.insert_user(username, false).await
    }

    /// Create a user with the superuser flag set.
    pub async fn create_superuser(&self, username: &str) -> Result<UserRecord> {
        self.insert_user(username, true).await
    }

    /// Create a group.
    pub async fn create_group(&self, codename: &str, name: Option<&str>) -> Result<GroupRecord> {
        let mut state = self.state.write().await;
        if state.groups.values().any(|g| g.codename == codename) {
            return Err(PermError::conflict(format!(
                "group {:?} already exists",
                codename
            )));
        }
        state.next_group_id += 1;
        let record = GroupRecord {
            id: GroupId(state.next_group_id),
            codename: codename.to_string(),
            name: name.map(str::to_string),
        };
        state.groups.insert(record.id, record.clone());
        debug!("Created group {} ({})", record.id, record.codename);
        Ok(record)
    }

    /// Add a user to a group. Returns false if already a member.
    pub async fn add_user_to_group(&self, user: UserId, group: GroupId) -> Result<bool> {
        let mut state = self.state.write().await;
        state.check_user(user)?;
        state.check_group(group)?;
        Ok(state.memberships.entry(user).or_default().insert(group))
    }

    /// Remove a user from a group. Returns false if not a member.
    pub async fn remove_user_from_group(&self, user: UserId, group: GroupId) -> Result<bool> {
        let mut state = self.state.write().await;
        state.check_user(user)?;
        state.check_group(group)?;
        Ok(state
            .memberships
            .get_mut(&user)
            .is_some_and(|groups| groups.remove(&group)))
    }

    /// Link a group to a parent group. Returns false if already linked.
    ///
    /// Parent links may form cycles; traversal bounds are the resolver's
    /// concern, not the directory's.
    pub async fn add_group_parent(&self, group: GroupId, parent: GroupId) -> Result<bool> {
        let mut state = self.state.write().await;
        state.check_group(group)?;
        state.check_group(parent)?;
        Ok(state.parents.entry(group).or_default().insert(parent))
    }

    /// Unlink a group from a parent group. Returns false if not linked.
    pub async fn remove_group_parent(&self, group: GroupId, parent: GroupId) -> Result<bool> {
        let mut state = self.state.write().await;
        state.check_group(group)?;
        state.check_group(parent)?;
        Ok(state
            .parents
            .get_mut(&group)
            .is_some_and(|parents| parents.remove(&parent)))
    }
}

#[async_trait::async_trait]
impl PermBackend for MemoryBackend {
    async fn insert_perm(&self, key: &PermKey, name: Option<String>) -> Result<Perm> {
        let mut state = self.state.write().await;
        if state.perm_index.contains_key(key) {
            return Err(PermError::conflict(format!(
                "permission {:?} already exists",
                format_key(key)
            )));
        }
        state.next_perm_id += 1;
        let perm = Perm {
            id: PermId(state.next_perm_id),
            key: key.clone(),
            name,
            created_at: Utc::now(),
        };
        state.perm_index.insert(key.clone(), perm.id);
        state.perms.insert(perm.id, perm.clone());
        debug!("Created permission {} ({})", perm.id, perm);
        Ok(perm)
    }

    async fn find_perm(&self, key: &PermKey) -> Result<Option<Perm>> {
        let state = self.state.read().await;
        Ok(state
            .perm_index
            .get(key)
            .and_then(|id| state.perms.get(id))
            .cloned())
    }

    async fn perm_by_id(&self, id: PermId) -> Result<Option<Perm>> {
        let state = self.state.read().await;
        Ok(state.perms.get(&id).cloned())
    }

    async fn list_perms(&self) -> Result<Vec<Perm>> {
        let state = self.state.read().await;
        Ok(state.perms.values().cloned().collect())
    }

    async fn list_perms_by_kind(&self, kind: PermKind) -> Result<Vec<Perm>> {
        let state = self.state.read().await;
        Ok(state
            .perms
            .values()
            .filter(|p| p.key.kind == kind)
            .cloned()
            .collect())
    }

    async fn delete_perm(&self, id: PermId) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(perm) = state.perms.remove(&id) else {
            return Ok(false);
        };
        state.perm_index.remove(&perm.key);
        for grants in state.grants.values_mut() {
            grants.remove(&id);
        }
        debug!("Deleted permission {} ({})", id, perm);
        Ok(true)
    }

    async fn add_grant(&self, holder: HolderRef, perm: PermId) -> Result<bool> {
        let mut state = self.state.write().await;
        state.check_holder(holder)?;
        state.check_perm(perm)?;
        let inserted = state.grants.entry(holder).or_default().insert(perm);
        if inserted {
            debug!("Granted permission {} to {}", perm, holder);
        }
        Ok(inserted)
    }

    async fn remove_grant(&self, holder: HolderRef, perm: PermId) -> Result<bool> {
        let mut state = self.state.write().await;
        state.check_holder(holder)?;
        let removed = state
            .grants
            .get_mut(&holder)
            .is_some_and(|grants| grants.remove(&perm));
        if removed {
            debug!("Revoked permission {} from {}", perm, holder);
        }
        Ok(removed)
    }

    async fn clear_grants(&self, holder: HolderRef) -> Result<u64> {
        let mut state = self.state.write().await;
        state.check_holder(holder)?;
        let removed = state
            .grants
            .remove(&holder)
            .map(|grants| grants.len() as u64)
            .unwrap_or(0);
        debug!("Cleared {} grants of {}", removed, holder);
        Ok(removed)
    }

    async fn direct_grants(&self, holder: HolderRef) -> Result<HashSet<PermId>> {
        let state = self.state.read().await;
        state.check_holder(holder)?;
        Ok(state.grants.get(&holder).cloned().unwrap_or_default())
    }

    async fn is_superuser(&self, user: UserId) -> Result<bool> {
        let state = self.state.read().await;
        state
            .users
            .get(&user)
            .map(|u| u.is_superuser)
            .ok_or_else(|| PermError::not_found(format!("user {} not found", user)))
    }

    async fn user_groups(&self, user: UserId) -> Result<Vec<GroupId>> {
        let state = self.state.read().await;
        state.check_user(user)?;
        let mut groups: Vec<GroupId> = state
            .memberships
            .get(&user)
            .map(|groups| groups.iter().copied().collect())
            .unwrap_or_default();
        groups.sort();
        Ok(groups)
    }

    async fn group_parents(&self, group: GroupId) -> Result<Vec<GroupId>> {
        let state = self.state.read().await;
        state.check_group(group)?;
        let mut parents: Vec<GroupId> = state
            .parents
            .get(&group)
            .map(|parents| parents.iter().copied().collect())
            .unwrap_or_default();
        parents.sort();
        Ok(parents)
    }
}
