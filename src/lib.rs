//! # permkit
//!
//! A generic, polymorphic permission system for Rust applications.
//! Permissions come in four granularities and attach to users and groups,
//! including nested group hierarchies and wildcard grants.
//!
//! ## Features
//!
//! - **Four permission kinds**: generic, per-model, per-object (row-level)
//!   and per-field
//! - **String keys**: permissions parse from compact keys such as
//!   `model.articles.Article.add` or `field.articles.Article.title.change`
//! - **Wildcard grants**: codename `*` covers every codename in its scope
//! - **Group inheritance**: grants flow through a nested group graph with
//!   cycle-safe, depth-bounded traversal
//! - **Superuser short-circuit**: flagged users pass every check
//! - **Pluggable persistence**: one async trait is the storage seam, with an
//!   in-memory reference backend included
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use permkit::{Config, MemoryBackend, PermSystem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(MemoryBackend::new());
//!     let mut config = Config::default();
//!     config.perms.auto_create = true;
//!     let system = PermSystem::with_backend(config, backend.clone())?;
//!
//!     let alice = backend.create_user("alice").await?;
//!     let editors = backend.create_group("editors", None).await?;
//!     backend.add_user_to_group(alice.id, editors.id).await?;
//!
//!     // a wildcard grant on the group covers every codename in scope
//!     system
//!         .group(editors.id)
//!         .add("model.articles.Article.*".into(), None)
//!         .await?;
//!
//!     let perms = system.user(alice.id);
//!     assert!(perms.has_perm("model.articles.Article.add".into(), None).await?);
//!     assert!(perms.has_perm("model.articles.Article.delete".into(), None).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,no_run
//! use permkit::{Config, PermSystem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("permkit.yaml").await?;
//!     let system = PermSystem::new(config)?;
//!     # let _ = system;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod access;
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use access::{HolderPerms, PermSystem};
pub use config::{Config, PermsConfig};
pub use core::keys::{
    ModelRef, ObjectRef, PermKey, PermKind, WILDCARD_CODENAME, format_key, parse_key,
};
pub use core::models::{GroupId, GroupRecord, HolderRef, Perm, PermId, UserId, UserRecord};
pub use core::resolver::{PermSpec, Resolver};
pub use storage::{MemoryBackend, PermBackend, PermStore};
pub use utils::error::{PermError, Result};
