//! Effective-set closure over the group graph

use std::collections::{HashSet, VecDeque};

use crate::core::models::{GroupId, HolderRef, PermId};
use crate::storage::PermBackend;
use crate::utils::error::Result;

/// Compute the holder's effective permission ids.
///
/// Direct grants are unioned with the grants of every group reachable
/// through the group graph: a user's direct groups sit at level 0, each
/// parent hop adds one level, and groups beyond `group_max_level` are not
/// visited. For a group holder the levels count parent hops from the group
/// itself, so level 0 keeps only its own grants.
///
/// The walk is breadth-first with a visited set: parent cycles terminate and
/// a group reachable via several paths contributes once.
pub(crate) async fn effective_perm_ids(
    backend: &dyn PermBackend,
    holder: HolderRef,
    group_max_level: u32,
) -> Result<HashSet<PermId>> {
    let mut effective = backend.direct_grants(holder).await?;
    let mut visited: HashSet<GroupId> = HashSet::new();
    let mut queue: VecDeque<(GroupId, u32)> = VecDeque::new();

    match holder {
        HolderRef::User(user) => {
            for group in backend.user_groups(user).await? {
                if visited.insert(group) {
                    queue.push_back((group, 0));
                }
            }
        }
        HolderRef::Group(group) => {
            visited.insert(group);
            if group_max_level >= 1 {
                for parent in backend.group_parents(group).await? {
                    if visited.insert(parent) {
                        queue.push_back((parent, 1));
                    }
                }
            }
        }
    }

    while let Some((group, level)) = queue.pop_front() {
        effective.extend(backend.direct_grants(HolderRef::Group(group)).await?);
        if level < group_max_level {
            for parent in backend.group_parents(group).await? {
                if visited.insert(parent) {
                    queue.push_back((parent, level + 1));
                }
            }
        }
    }

    Ok(effective)
}
