//! Utility modules for permkit
//!
//! Currently this only hosts the error types shared by every component.

pub mod error;

// Re-export commonly used types
pub use error::{PermError, Result};
