//! Permission system root handle

use std::sync::Arc;

use tracing::info;

use crate::access::holders::HolderPerms;
use crate::config::Config;
use crate::core::models::{GroupId, HolderRef, UserId};
use crate::core::resolver::Resolver;
use crate::storage::{MemoryBackend, PermBackend, PermStore};
use crate::utils::error::{PermError, Result};

/// Root handle wiring the backend, store and resolver from configuration.
///
/// The backend is resolved exactly once, at construction. Embedders with
/// their own persistence pass it through [`with_backend`](Self::with_backend)
/// and keep their own handle for directory seeding.
#[derive(Clone)]
pub struct PermSystem {
    config: Arc<Config>,
    backend: Arc<dyn PermBackend>,
    store: Arc<PermStore>,
    resolver: Arc<Resolver>,
}

impl std::fmt::Debug for PermSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermSystem")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PermSystem {
    /// Build a system with the backend named in the configuration.
    pub fn new(config: Config) -> Result<Self> {
        let backend: Arc<dyn PermBackend> = match config.perms.backend.as_str() {
            "memory" => Arc::new(MemoryBackend::new()),
            other => {
                return Err(PermError::misconfigured(format!(
                    "unknown permission backend {:?}",
                    other
                )));
            }
        };
        Self::with_backend(config, backend)
    }

    /// Build a system over a caller-supplied backend.
    pub fn with_backend(config: Config, backend: Arc<dyn PermBackend>) -> Result<Self> {
        config.validate()?;
        info!(
            "Initializing permission system (backend {:?}, auto_create {}, group_max_level {})",
            config.perms.backend, config.perms.auto_create, config.perms.group_max_level
        );

        let config = Arc::new(config);
        let store = Arc::new(PermStore::new(backend.clone(), &config.perms));
        let resolver = Arc::new(Resolver::new(
            store.clone(),
            backend.clone(),
            config.perms.group_max_level,
        ));

        Ok(Self {
            config,
            backend,
            store,
            resolver,
        })
    }

    /// Get the system configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the storage backend
    pub fn backend(&self) -> &Arc<dyn PermBackend> {
        &self.backend
    }

    /// Get the permission store
    pub fn store(&self) -> &PermStore {
        &self.store
    }

    /// Get the resolver
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Permission view for a user.
    pub fn user(&self, id: UserId) -> HolderPerms {
        self.holder(HolderRef::User(id))
    }

    /// Permission view for a group.
    pub fn group(&self, id: GroupId) -> HolderPerms {
        self.holder(HolderRef::Group(id))
    }

    /// Permission view for any holder reference.
    pub fn holder(&self, holder: HolderRef) -> HolderPerms {
        HolderPerms::new(
            holder,
            self.backend.clone(),
            self.store.clone(),
            self.resolver.clone(),
        )
    }
}
