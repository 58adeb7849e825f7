use crate::areas::repository::Repository;
use crate::artifacts::merge::conflict::{Conflict, PendingMerge};
use crate::artifacts::merge::three_way::{MergeResult, three_way_merge};
use crate::artifacts::merge::{lowest_common_ancestor, merge_message};
use crate::artifacts::objects::Snapshot;
use crate::artifacts::objects::object_id::CommitId;
use crate::error::{RepositoryError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// How a merge or cherry-pick ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum MergeOutcome {
    /// A new commit was created
    Committed(CommitId),
    /// Stopped on a conflict; the clean part is applied to the working tree
    Conflicted(Conflict),
}

/// Merge of `theirs` into HEAD, plus the working tree it leaves behind
///
/// The working tree is the current one with the merge's changes laid on top,
/// so uncommitted edits to paths the merge leaves alone survive.
pub(crate) struct HeadMerge {
    pub(crate) commit: MergeResult,
    pub(crate) working_tree: Snapshot,
}

impl Repository {
    /// Merge a branch into the current one
    ///
    /// Always records a two-parent merge commit, even when one side is an
    /// ancestor of the other. On conflict nothing is committed: the conflict
    /// and the pending merge are recorded, and every path that merged cleanly
    /// is written to the working tree and staged.
    pub fn merge(&mut self, branch: &str) -> Result<MergeOutcome> {
        let current = self.require_attached("merge")?;
        self.require_no_merge()?;
        let head = self.require_head()?;
        let (other_name, other_tip) = self
            .refs
            .find_branch(branch)
            .map(|(name, oid)| (name.clone(), oid.clone()))
            .ok_or_else(|| RepositoryError::BranchNotFound(branch.to_string()))?;

        if other_tip == head {
            return Err(RepositoryError::SelfMergeNoop(branch.to_string()));
        }

        let base = lowest_common_ancestor(&self.database, &head, &other_tip);
        debug!(
            head = %head,
            other = %other_tip,
            base = ?base.as_ref().map(CommitId::to_short_oid),
            "merge base"
        );

        let theirs = self.load_commit(&other_tip)?.snapshot().clone();
        let ancestor = match &base {
            Some(base) => Some(self.load_commit(base)?.snapshot().clone()),
            None => None,
        };
        let merge = self.merge_onto_head("merge", &theirs, ancestor.as_ref())?;

        if let Some(conflict) = merge.commit.conflict {
            self.stop_on_conflict(merge.working_tree, conflict.clone());
            self.pending_merge = Some(PendingMerge::new(other_tip, other_name));

            info!(branch, path = %conflict.path, "merge stopped on conflict");
            return Ok(MergeOutcome::Conflicted(conflict));
        }

        let message = merge_message(&other_name, current.as_ref());
        let oid = self.database.create_commit(
            vec![head, other_tip],
            &message,
            merge.commit.merged,
            current.as_ref(),
        );
        self.refs.update_head(oid.clone());
        self.check_out_snapshot(merge.working_tree);

        info!(branch, oid = %oid, "merged");

        Ok(MergeOutcome::Committed(oid))
    }

    /// Merge `theirs` into HEAD's snapshot
    ///
    /// Fails without touching anything when a path the merge would rewrite,
    /// or the conflicting path, has uncommitted changes in the working tree.
    pub(crate) fn merge_onto_head(
        &self,
        operation: &'static str,
        theirs: &Snapshot,
        ancestor: Option<&Snapshot>,
    ) -> Result<HeadMerge> {
        let ours = self.head_snapshot();
        let commit = three_way_merge(&ours, &ours, theirs, ancestor);

        let touched = commit
            .merged
            .keys()
            .chain(ours.keys())
            .filter(|path| commit.merged.get(*path) != ours.get(*path))
            .chain(commit.conflict.as_ref().map(|conflict| &conflict.path))
            .collect::<BTreeSet<_>>();

        let mut working_tree = self.workspace.files().clone();
        for path in touched {
            if working_tree.get(path) != ours.get(path) {
                return Err(RepositoryError::LocalChangesOverwritten(
                    path.clone(),
                    operation,
                ));
            }
            match commit.merged.get(path) {
                Some(content) => working_tree.insert(path.clone(), content.clone()),
                None => working_tree.remove(path),
            };
        }

        Ok(HeadMerge {
            commit,
            working_tree,
        })
    }

    /// Apply the clean part of a merge and record the conflict
    pub(crate) fn stop_on_conflict(&mut self, working_tree: Snapshot, conflict: Conflict) {
        self.workspace.replace(working_tree);
        self.stage_differences_from_head();
        self.conflict = Some(conflict);
    }
}
