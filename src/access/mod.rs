//! Consumer-facing access layer
//!
//! [`PermSystem`] wires the configured backend, store and resolver once at
//! startup; [`HolderPerms`] is the per-holder view consumers work with.

pub mod holders;
pub mod system;

pub use holders::HolderPerms;
pub use system::PermSystem;
