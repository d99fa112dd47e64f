//! Per-holder permission view

use std::sync::Arc;

use crate::core::keys::ObjectRef;
use crate::core::models::{HolderRef, Perm};
use crate::core::resolver::{PermSpec, Resolver};
use crate::storage::{PermBackend, PermStore};
use crate::utils::error::{PermError, Result};

/// Permission operations scoped to one holder.
///
/// Obtained from [`PermSystem::user`](crate::access::PermSystem::user) or
/// [`PermSystem::group`](crate::access::PermSystem::group); a plain value
/// delegating to the resolver and store, nothing is attached to the caller's
/// user or group entities.
#[derive(Clone)]
pub struct HolderPerms {
    holder: HolderRef,
    backend: Arc<dyn PermBackend>,
    store: Arc<PermStore>,
    resolver: Arc<Resolver>,
}

impl HolderPerms {
    pub(crate) fn new(
        holder: HolderRef,
        backend: Arc<dyn PermBackend>,
        store: Arc<PermStore>,
        resolver: Arc<Resolver>,
    ) -> Self {
        Self {
            holder,
            backend,
            store,
            resolver,
        }
    }

    /// The holder this view is scoped to.
    pub fn holder(&self) -> HolderRef {
        self.holder
    }

    /// Directly-granted permissions, ordered by codename then id.
    pub async fn all(&self) -> Result<Vec<Perm>> {
        let ids = self.backend.direct_grants(self.holder).await?;
        self.store.perms_by_ids(&ids).await
    }

    /// Effective permissions, inherited grants included, ordered by codename
    /// then id.
    pub async fn effective(&self) -> Result<Vec<Perm>> {
        self.resolver.effective_perms(self.holder).await
    }

    /// Grant a permission directly to this holder.
    pub async fn add(&self, spec: PermSpec<'_>, obj: Option<&ObjectRef>) -> Result<Perm> {
        self.resolver.add_perm(self.holder, spec, obj).await
    }

    /// Grant several permissions by key, failing fast.
    pub async fn add_many(&self, keys: &[&str], obj: Option<&ObjectRef>) -> Result<Vec<Perm>> {
        let mut perms = Vec::with_capacity(keys.len());
        for key in keys {
            perms.push(self.add(PermSpec::Key(key), obj).await?);
        }
        Ok(perms)
    }

    /// Revoke a directly-held permission; no-op when not held.
    pub async fn remove(&self, spec: PermSpec<'_>, obj: Option<&ObjectRef>) -> Result<()> {
        self.resolver.remove_perm(self.holder, spec, obj).await
    }

    /// Whether this holder has the permission.
    pub async fn has_perm(&self, spec: PermSpec<'_>, obj: Option<&ObjectRef>) -> Result<bool> {
        self.resolver.has_perm(self.holder, spec, obj).await
    }

    /// The permission row if this holder holds it effectively, `NotFound`
    /// otherwise.
    pub async fn get(&self, spec: PermSpec<'_>, obj: Option<&ObjectRef>) -> Result<Perm> {
        let perm = self.resolver.resolve(spec, obj).await?;
        let effective = self.resolver.effective_perm_ids(self.holder).await?;
        if effective.contains(&perm.id) {
            Ok(perm)
        } else {
            Err(PermError::not_found(format!(
                "{} does not hold permission {}",
                self.holder, perm
            )))
        }
    }

    /// Remove every direct grant of this holder, returning how many.
    pub async fn clear(&self) -> Result<u64> {
        self.resolver.clear(self.holder).await
    }
}
