use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::CommitId;
use derive_new::new;
use serde::Serialize;

/// First diverging path found by a three-way merge
///
/// Each side is `None` when the path does not exist there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct Conflict {
    pub path: String,
    pub ours: Option<String>,
    pub theirs: Option<String>,
    pub ancestor: Option<String>,
}

/// An interrupted merge waiting for its resolving commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct PendingMerge {
    /// Becomes the second parent of the resolving commit
    pub other_commit_id: CommitId,
    pub other_branch_name: BranchName,
}
