//! References (branches and HEAD)
//!
//! Branches are named pointers to commits. HEAD is the current checkout
//! position and is either:
//! - Attached: follows a branch, so moving HEAD moves the branch
//! - Detached: sits on a commit directly and moves no branch
//!
//! Before the first commit HEAD is attached to a branch that does not exist
//! yet (an unborn branch), exactly like a freshly initialized git repository.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::CommitId;
use crate::error::RepositoryError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Current checkout position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "camelCase")]
pub enum Head {
    /// Following the named branch
    Attached(BranchName),
    /// Sitting on a commit directly
    Detached(CommitId),
}

impl Head {
    pub fn is_detached(&self) -> bool {
        matches!(self, Head::Detached(_))
    }

    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            Head::Attached(branch_name) => Some(branch_name),
            Head::Detached(_) => None,
        }
    }
}

/// Reference store
///
/// Every branch value must name a live commit; callers only hand in IDs they
/// read from the object store.
#[derive(Debug, Clone)]
pub struct Refs {
    branches: BTreeMap<BranchName, CommitId>,
    head: Head,
}

impl Refs {
    /// Empty store with HEAD on the unborn `default_branch`
    pub fn new(default_branch: BranchName) -> Self {
        Refs {
            branches: BTreeMap::new(),
            head: Head::Attached(default_branch),
        }
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn set_head(&mut self, head: Head) {
        self.head = head;
    }

    /// Commit HEAD resolves to, `None` while the current branch is unborn
    pub fn read_head(&self) -> Option<CommitId> {
        match &self.head {
            Head::Attached(branch_name) => self.branches.get(branch_name).cloned(),
            Head::Detached(oid) => Some(oid.clone()),
        }
    }

    /// Move HEAD to a commit
    ///
    /// When attached, the current branch moves along; when detached, HEAD
    /// is simply re-pointed.
    pub fn update_head(&mut self, oid: CommitId) {
        match self.head.clone() {
            Head::Attached(branch_name) => self.update_ref(branch_name, oid),
            Head::Detached(_) => self.head = Head::Detached(oid),
        }
    }

    pub fn current_branch(&self) -> Option<&BranchName> {
        self.head.branch()
    }

    /// Check if a branch is the currently checked-out branch
    pub fn is_current_branch(&self, branch_name: &BranchName) -> bool {
        self.current_branch() == Some(branch_name)
    }

    pub fn read_ref(&self, branch_name: &BranchName) -> Option<&CommitId> {
        self.branches.get(branch_name)
    }

    /// Look a branch up by its textual name
    pub fn find_branch(&self, name: &str) -> Option<(&BranchName, &CommitId)> {
        self.branches
            .iter()
            .find(|(branch_name, _)| branch_name.as_ref() == name)
    }

    /// Create a branch, failing if the name is taken
    pub fn create_branch(
        &mut self,
        branch_name: BranchName,
        oid: CommitId,
    ) -> Result<(), RepositoryError> {
        if self.branches.contains_key(&branch_name) {
            return Err(RepositoryError::BranchAlreadyExists(
                branch_name.to_string(),
            ));
        }

        self.branches.insert(branch_name, oid);
        Ok(())
    }

    /// Create or move a branch pointer
    pub fn update_ref(&mut self, branch_name: BranchName, oid: CommitId) {
        self.branches.insert(branch_name, oid);
    }

    /// All branches ordered by name
    pub fn list_branches(&self) -> impl Iterator<Item = (&BranchName, &CommitId)> {
        self.branches.iter()
    }

    /// Every commit a ref points at: all branch tips plus HEAD
    pub fn tips(&self) -> Vec<CommitId> {
        let mut tips = self.branches.values().cloned().collect::<Vec<_>>();
        if let Some(head) = self.read_head() {
            tips.push(head);
        }
        tips
    }

    /// Drop all branches and re-attach HEAD to the given unborn branch
    pub fn clear(&mut self, default_branch: BranchName) {
        self.branches.clear();
        self.head = Head::Attached(default_branch);
    }
}
