//! Permission store facade
//!
//! Wraps the configured backend with the resolution policy: wildcard
//! fallback for lookups and the auto-create rule for the grant path.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::PermsConfig;
use crate::core::keys::{ObjectRef, PermKey, PermKind, format_key, parse_key};
use crate::core::models::{CodenameMap, Perm, PermId};
use crate::storage::backend::PermBackend;
use crate::utils::error::{PermError, Result};

/// Store facade over an [`PermBackend`] implementation.
pub struct PermStore {
    backend: Arc<dyn PermBackend>,
    auto_create: bool,
    codenames: CodenameMap,
}

impl PermStore {
    pub fn new(backend: Arc<dyn PermBackend>, config: &PermsConfig) -> Self {
        Self {
            backend,
            auto_create: config.auto_create,
            codenames: CodenameMap::with_extras(&config.codenames),
        }
    }

    /// Fetch the permission for `key`, creating it when absent.
    ///
    /// Safe under concurrent callers: a `Conflict` from the backend means
    /// another caller created the row first, so the winner is re-fetched.
    pub async fn get_or_create(&self, key: &PermKey) -> Result<Perm> {
        if let Some(perm) = self.backend.find_perm(key).await? {
            return Ok(perm);
        }
        match self.backend.insert_perm(key, None).await {
            Ok(perm) => Ok(perm),
            Err(PermError::Conflict(_)) => {
                warn!(
                    "Concurrent create of {:?}, fetching the winner",
                    format_key(key)
                );
                self.backend.find_perm(key).await?.ok_or_else(|| {
                    PermError::storage(format!(
                        "permission {:?} vanished after conflict",
                        format_key(key)
                    ))
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch the permission for the exact `key`, failing `NotFound` on miss.
    pub async fn find(&self, key: &PermKey) -> Result<Perm> {
        self.backend.find_perm(key).await?.ok_or_else(|| {
            PermError::not_found(format!("permission {:?} not found", format_key(key)))
        })
    }

    /// Fetch the permission by id, failing `NotFound` on miss.
    pub async fn by_id(&self, id: PermId) -> Result<Perm> {
        self.backend
            .perm_by_id(id)
            .await?
            .ok_or_else(|| PermError::not_found(format!("permission {} not found", id)))
    }

    /// Resolve `key` with wildcard fallback, never creating rows.
    ///
    /// The exact codename is looked up first; on miss the wildcard sentinel
    /// in the same scope is tried. `NotFound` only when both lookups miss.
    pub async fn resolve_with_wildcard(&self, key: &PermKey) -> Result<Perm> {
        if let Some(perm) = self.backend.find_perm(key).await? {
            return Ok(perm);
        }
        if !key.is_wildcard() {
            if let Some(perm) = self.backend.find_perm(&key.wildcard_of()).await? {
                debug!(
                    "Resolved {:?} through its scope wildcard",
                    format_key(key)
                );
                return Ok(perm);
            }
        }
        Err(PermError::not_found(format!(
            "permission {:?} not found",
            format_key(key)
        )))
    }

    /// Resolve `key` for the grant path.
    ///
    /// With auto-create configured, a miss on the exact lookup creates the
    /// exact row instead of falling through to the wildcard; otherwise this
    /// behaves as [`resolve_with_wildcard`](Self::resolve_with_wildcard).
    pub async fn resolve_or_create(&self, key: &PermKey) -> Result<Perm> {
        if self.auto_create {
            self.get_or_create(key).await
        } else {
            self.resolve_with_wildcard(key).await
        }
    }

    /// Parse `key` and fetch the exact permission row.
    pub async fn get_from_key(&self, key: &str, obj: Option<&ObjectRef>) -> Result<Perm> {
        let key = parse_key(key, obj)?;
        self.find(&key).await
    }

    /// Parse `key` and create its permission row, failing `Conflict` on a
    /// duplicate.
    pub async fn create_from_key(&self, key: &str, obj: Option<&ObjectRef>) -> Result<Perm> {
        let key = parse_key(key, obj)?;
        self.backend.insert_perm(&key, None).await
    }

    /// Create permission rows for several keys at once, failing fast.
    pub async fn create_from_keys(
        &self,
        keys: &[&str],
        obj: Option<&ObjectRef>,
    ) -> Result<Vec<Perm>> {
        let mut perms = Vec::with_capacity(keys.len());
        for key in keys {
            perms.push(self.create_from_key(key, obj).await?);
        }
        Ok(perms)
    }

    /// Whether a permission matching `key` exists, wildcard fallback
    /// included. Parse errors propagate.
    pub async fn perm_exists(&self, key: &str, obj: Option<&ObjectRef>) -> Result<bool> {
        let key = parse_key(key, obj)?;
        match self.resolve_with_wildcard(&key).await {
            Ok(_) => Ok(true),
            Err(PermError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// All permission rows, ordered by codename then id.
    pub async fn list(&self) -> Result<Vec<Perm>> {
        let mut perms = self.backend.list_perms().await?;
        sort_perms(&mut perms);
        Ok(perms)
    }

    /// All permission rows of one kind, ordered by codename then id.
    pub async fn list_by_kind(&self, kind: PermKind) -> Result<Vec<Perm>> {
        let mut perms = self.backend.list_perms_by_kind(kind).await?;
        sort_perms(&mut perms);
        Ok(perms)
    }

    /// The rows for a set of permission ids, ordered by codename then id.
    pub async fn perms_by_ids(&self, ids: &HashSet<PermId>) -> Result<Vec<Perm>> {
        let mut perms = self.backend.list_perms().await?;
        perms.retain(|p| ids.contains(&p.id));
        sort_perms(&mut perms);
        Ok(perms)
    }

    /// Delete a permission row and its grants. Returns whether it existed.
    pub async fn delete(&self, id: PermId) -> Result<bool> {
        self.backend.delete_perm(id).await
    }

    /// Human-readable description of a permission, configured codename
    /// display names applied.
    pub fn describe(&self, perm: &Perm) -> String {
        perm.display_name(&self.codenames)
    }
}

fn sort_perms(perms: &mut [Perm]) {
    perms.sort_by(|a, b| {
        a.key
            .codename
            .cmp(&b.key.codename)
            .then_with(|| a.id.cmp(&b.id))
    });
}
