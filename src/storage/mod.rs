//! Storage layer for permission rows and grants
//!
//! The [`PermBackend`] trait is the persistence seam: an embedder backs it
//! with its relational store, the crate ships [`MemoryBackend`] as the
//! reference implementation. [`PermStore`] layers resolution policy (wildcard
//! fallback, auto-create) on top of whichever backend is configured.

pub mod backend;
pub mod memory;
pub mod store;

pub use backend::PermBackend;
pub use memory::MemoryBackend;
pub use store::PermStore;
