//! Permission key codec
//!
//! Permissions are addressed by dotted key strings such as
//! `model.articles.Article.add`. This module defines the canonical
//! descriptor types and the strict parser/formatter between the two forms.

mod codec;
mod types;

// Re-export public types and functions
pub use codec::{format_key, parse_key};
pub use types::{ModelRef, ObjectRef, PermKey, PermKind, WILDCARD_CODENAME};
