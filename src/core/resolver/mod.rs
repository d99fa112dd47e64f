//! Permission resolution
//!
//! The resolver answers grant/deny questions and applies grant mutations for
//! a holder. `has_perm` applies, in order: the superuser short-circuit, key
//! resolution with wildcard fallback, then membership of the resolved row in
//! the holder's effective permission set. The effective set unions direct
//! grants with grants inherited through the group graph, bounded by the
//! configured maximum traversal level.

mod effective;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::core::keys::{ObjectRef, parse_key};
use crate::core::models::{HolderRef, Perm, PermId};
use crate::storage::{PermBackend, PermStore};
use crate::utils::error::Result;

/// A permission argument: a key string, an already-resolved row, or an id.
#[derive(Debug, Clone, Copy)]
pub enum PermSpec<'a> {
    /// A key string such as `model.articles.Article.add`
    Key(&'a str),
    /// An already-resolved permission row
    Perm(&'a Perm),
    /// A permission id
    Id(PermId),
}

impl<'a> From<&'a str> for PermSpec<'a> {
    fn from(key: &'a str) -> Self {
        PermSpec::Key(key)
    }
}

impl<'a> From<&'a Perm> for PermSpec<'a> {
    fn from(perm: &'a Perm) -> Self {
        PermSpec::Perm(perm)
    }
}

impl From<PermId> for PermSpec<'_> {
    fn from(id: PermId) -> Self {
        PermSpec::Id(id)
    }
}

/// Grant/deny decisions and grant mutations for holders.
pub struct Resolver {
    store: Arc<PermStore>,
    backend: Arc<dyn PermBackend>,
    group_max_level: u32,
}

impl Resolver {
    pub fn new(store: Arc<PermStore>, backend: Arc<dyn PermBackend>, group_max_level: u32) -> Self {
        Self {
            store,
            backend,
            group_max_level,
        }
    }

    /// Maximum number of parent hops the group traversal follows.
    pub fn group_max_level(&self) -> u32 {
        self.group_max_level
    }

    /// Whether the holder has the permission.
    ///
    /// Superusers pass every check before the permission argument is even
    /// parsed. An unresolvable permission (malformed key, or no matching row
    /// and no wildcard in scope) denies instead of failing the caller;
    /// object-reference errors and backend failures still propagate.
    pub async fn has_perm(
        &self,
        holder: HolderRef,
        spec: PermSpec<'_>,
        obj: Option<&ObjectRef>,
    ) -> Result<bool> {
        if let HolderRef::User(user) = holder {
            if self.backend.is_superuser(user).await? {
                debug!("Granted to {}: superuser", holder);
                return Ok(true);
            }
        }

        let perm = match self.resolve(spec, obj).await {
            Ok(perm) => perm,
            Err(err) if err.is_resolution_miss() => {
                debug!("Denied to {}: {}", holder, err);
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        let effective = self.effective_perm_ids(holder).await?;
        Ok(effective.contains(&perm.id))
    }

    /// Resolve a permission argument to its row, wildcard fallback applied,
    /// never creating anything.
    pub async fn resolve(&self, spec: PermSpec<'_>, obj: Option<&ObjectRef>) -> Result<Perm> {
        self.resolve_spec(spec, obj, false).await
    }

    /// Grant the permission directly to the holder.
    ///
    /// The permission argument resolves with the auto-create policy applied;
    /// granting an already-held permission is a no-op. Returns the resolved
    /// row.
    pub async fn add_perm(
        &self,
        holder: HolderRef,
        spec: PermSpec<'_>,
        obj: Option<&ObjectRef>,
    ) -> Result<Perm> {
        let perm = self.resolve_spec(spec, obj, true).await?;
        self.backend.add_grant(holder, perm.id).await?;
        Ok(perm)
    }

    /// Revoke a directly-held permission.
    ///
    /// Never auto-creates. Removing a permission the holder does not hold is
    /// a no-op; an unresolvable permission argument is an error.
    pub async fn remove_perm(
        &self,
        holder: HolderRef,
        spec: PermSpec<'_>,
        obj: Option<&ObjectRef>,
    ) -> Result<()> {
        let perm = self.resolve(spec, obj).await?;
        self.backend.remove_grant(holder, perm.id).await?;
        Ok(())
    }

    /// Remove every direct grant of the holder, returning how many.
    pub async fn clear(&self, holder: HolderRef) -> Result<u64> {
        self.backend.clear_grants(holder).await
    }

    /// The holder's effective permission ids, inherited grants included.
    ///
    /// Computed fresh on every call; grants are mutable and nothing here may
    /// outlive one operation.
    pub async fn effective_perm_ids(&self, holder: HolderRef) -> Result<HashSet<PermId>> {
        effective::effective_perm_ids(self.backend.as_ref(), holder, self.group_max_level).await
    }

    /// The holder's effective permission rows, ordered by codename then id.
    pub async fn effective_perms(&self, holder: HolderRef) -> Result<Vec<Perm>> {
        let ids = self.effective_perm_ids(holder).await?;
        self.store.perms_by_ids(&ids).await
    }

    async fn resolve_spec(
        &self,
        spec: PermSpec<'_>,
        obj: Option<&ObjectRef>,
        create: bool,
    ) -> Result<Perm> {
        match spec {
            PermSpec::Key(key) => {
                let key = parse_key(key, obj)?;
                if create {
                    self.store.resolve_or_create(&key).await
                } else {
                    self.store.resolve_with_wildcard(&key).await
                }
            }
            PermSpec::Perm(perm) => Ok(perm.clone()),
            PermSpec::Id(id) => self.store.by_id(id).await,
        }
    }
}
