//! Three-way merge of file snapshots
//!
//! For every path present in `ours` or `theirs`, with O the ancestor's
//! content, A ours and B theirs (each possibly absent):
//!
//! | Condition            | Result                              |
//! |----------------------|-------------------------------------|
//! | A == B               | unchanged                           |
//! | A == O, B != O       | take B (absent B deletes the path)  |
//! | A != O, B == O       | keep A                              |
//! | A != O, B != O       | conflict, scanning stops            |
//!
//! Paths are visited in sorted order, so the reported conflict is the first
//! diverging path by name. Paths after it keep their value from `base`.
//! [`replay_merge`] applies the same table but scans every path.

use crate::artifacts::merge::conflict::Conflict;
use crate::artifacts::objects::Snapshot;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub merged: Snapshot,
    pub conflict: Option<Conflict>,
}

impl MergeResult {
    pub fn is_clean(&self) -> bool {
        self.conflict.is_none()
    }
}

/// Outcome for a single path
enum PathMerge<'a> {
    Keep,
    Take(Option<&'a String>),
    Conflict(Conflict),
}

fn merge_path<'a>(
    path: &str,
    ours: &Snapshot,
    theirs: &'a Snapshot,
    ancestor: &Snapshot,
) -> PathMerge<'a> {
    let original = ancestor.get(path);
    let ours_content = ours.get(path);
    let theirs_content = theirs.get(path);

    if ours_content == theirs_content || theirs_content == original {
        return PathMerge::Keep;
    }

    if ours_content == original {
        return PathMerge::Take(theirs_content);
    }

    PathMerge::Conflict(Conflict::new(
        path.to_string(),
        ours_content.cloned(),
        theirs_content.cloned(),
        original.cloned(),
    ))
}

fn apply(merged: &mut Snapshot, path: &str, content: Option<&String>) {
    match content {
        Some(content) => merged.insert(path.to_string(), content.clone()),
        None => merged.remove(path),
    };
}

/// Merge `theirs` into `ours` relative to `ancestor`, starting from `base`
///
/// `base` is the snapshot the result is built on, normally the same as
/// `ours`. A missing ancestor means the histories share nothing, so every
/// path counts as new on both sides.
pub fn three_way_merge(
    base: &Snapshot,
    ours: &Snapshot,
    theirs: &Snapshot,
    ancestor: Option<&Snapshot>,
) -> MergeResult {
    let empty = Snapshot::new();
    let ancestor = ancestor.unwrap_or(&empty);
    let mut merged = base.clone();

    let paths = ours.keys().chain(theirs.keys()).collect::<BTreeSet<_>>();

    for path in paths {
        match merge_path(path, ours, theirs, ancestor) {
            PathMerge::Keep => {}
            PathMerge::Take(content) => apply(&mut merged, path, content),
            PathMerge::Conflict(conflict) => {
                debug!(path = %path, "merge conflict");
                return MergeResult {
                    merged,
                    conflict: Some(conflict),
                };
            }
        }
    }

    MergeResult {
        merged,
        conflict: None,
    }
}

/// Result of a merge that never stops early
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    pub merged: Snapshot,
    /// Every diverging path, in sorted order
    pub conflicts: Vec<Conflict>,
}

/// Apply every clean change from `theirs` onto `ours`
///
/// Unlike [`three_way_merge`] the scan covers all paths. Diverging paths
/// keep `ours` and are collected in `conflicts`.
pub fn replay_merge(
    ours: &Snapshot,
    theirs: &Snapshot,
    ancestor: Option<&Snapshot>,
) -> ReplayResult {
    let empty = Snapshot::new();
    let ancestor = ancestor.unwrap_or(&empty);
    let mut merged = ours.clone();
    let mut conflicts = Vec::new();

    let paths = ours.keys().chain(theirs.keys()).collect::<BTreeSet<_>>();

    for path in paths {
        match merge_path(path, ours, theirs, ancestor) {
            PathMerge::Keep => {}
            PathMerge::Take(content) => apply(&mut merged, path, content),
            PathMerge::Conflict(conflict) => {
                debug!(path = %path, "replay conflict");
                conflicts.push(conflict);
            }
        }
    }

    ReplayResult { merged, conflicts }
}
