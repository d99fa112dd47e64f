//! Common test utilities and fixtures
//!
//! Provides a system builder over the in-memory backend plus a seeded
//! directory of users and groups that the integration tests share.

use std::sync::Arc;
use std::sync::Once;

use permkit::{
    Config, GroupRecord, MemoryBackend, PermSystem, PermsConfig, UserRecord,
};

static TRACING: Once = Once::new();

/// Install a tracing subscriber once for the whole test binary.
///
/// Honors `RUST_LOG` when set and stays quiet otherwise.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A permission system wired to an in-memory backend, with the backend
/// handle kept around so tests can seed users and groups directly.
pub struct TestSystem {
    pub backend: Arc<MemoryBackend>,
    pub system: PermSystem,
}

impl TestSystem {
    /// System with default settings: checks only, no auto-create,
    /// group traversal bounded at 10 levels.
    pub fn new() -> Self {
        Self::with_perms(PermsConfig::default())
    }

    /// System that creates missing permission rows when granting.
    pub fn auto_create() -> Self {
        let perms = PermsConfig {
            auto_create: true,
            ..PermsConfig::default()
        };
        Self::with_perms(perms)
    }

    /// System with an explicit group traversal bound.
    pub fn with_group_max_level(group_max_level: u32) -> Self {
        let perms = PermsConfig {
            auto_create: true,
            group_max_level,
            ..PermsConfig::default()
        };
        Self::with_perms(perms)
    }

    /// System built from the given permission settings.
    pub fn with_perms(perms: PermsConfig) -> Self {
        init_tracing();
        let backend = Arc::new(MemoryBackend::new());
        let config = Config { perms };
        let system = PermSystem::with_backend(config, backend.clone())
            .expect("test system should build from a valid config");
        Self { backend, system }
    }
}

impl Default for TestSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// A small seeded directory shared by the integration tests.
///
/// Membership layout: `alice` belongs to `editors`, and the group chain
/// runs `editors -> staff -> admins`. `bob` belongs to nothing, and
/// `root` is a superuser.
pub struct Directory {
    pub alice: UserRecord,
    pub bob: UserRecord,
    pub root: UserRecord,
    pub editors: GroupRecord,
    pub staff: GroupRecord,
    pub admins: GroupRecord,
}

/// Populate `backend` with the standard test directory.
pub async fn seed_directory(backend: &MemoryBackend) -> Directory {
    let alice = backend
        .create_user("alice")
        .await
        .expect("create alice");
    let bob = backend.create_user("bob").await.expect("create bob");
    let root = backend
        .create_superuser("root")
        .await
        .expect("create root");

    let editors = backend
        .create_group("editors", Some("Editors"))
        .await
        .expect("create editors");
    let staff = backend
        .create_group("staff", Some("Staff"))
        .await
        .expect("create staff");
    let admins = backend
        .create_group("admins", Some("Admins"))
        .await
        .expect("create admins");

    backend
        .add_user_to_group(alice.id, editors.id)
        .await
        .expect("alice joins editors");
    backend
        .add_group_parent(editors.id, staff.id)
        .await
        .expect("editors under staff");
    backend
        .add_group_parent(staff.id, admins.id)
        .await
        .expect("staff under admins");

    Directory {
        alice,
        bob,
        root,
        editors,
        staff,
        admins,
    }
}
