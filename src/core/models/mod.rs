//! Domain records shared across the crate
//!
//! Permission rows, holder identifiers and the codename display map.

mod codenames;
mod holder;
mod permission;

pub use codenames::{CodenameMap, default_codenames};
pub use holder::{GroupId, GroupRecord, HolderRef, UserId, UserRecord};
pub use permission::{Perm, PermId};
