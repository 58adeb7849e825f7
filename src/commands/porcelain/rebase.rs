use crate::areas::repository::Repository;
use crate::artifacts::log::ancestors::is_ancestor;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::merge::lowest_common_ancestor;
use crate::artifacts::merge::three_way::replay_merge;
use crate::artifacts::objects::object_id::CommitId;
use crate::error::{RepositoryError, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// One commit copied onto the new base
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayedCommit {
    pub original: CommitId,
    pub replayed: CommitId,
    /// Paths that diverged during replay; the new base's content was kept
    pub conflicts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebaseOutcome {
    /// Where HEAD ended up
    pub head: CommitId,
    /// True when the branch was simply moved to the target tip
    pub fast_forward: bool,
    /// Replayed commits, oldest first
    pub replayed: Vec<ReplayedCommit>,
}

impl RebaseOutcome {
    pub fn conflicts(&self) -> impl Iterator<Item = &str> {
        self.replayed
            .iter()
            .flat_map(|commit| commit.conflicts.iter().map(String::as_str))
    }
}

impl Repository {
    /// Replay the current branch on top of another branch
    ///
    /// Only the first-parent chain down to the merge base is replayed, so
    /// commits reached only through a merge's second parent are left out.
    /// Replay never stops. A conflicting step keeps the new base's content for
    /// each diverging path, still applies the commit's other changes, is
    /// committed anyway and is reported in the outcome.
    pub fn rebase(&mut self, branch: &str) -> Result<RebaseOutcome> {
        let current = self.require_attached("rebase")?;
        self.require_no_merge()?;
        let head = self.require_head()?;
        let target_tip = self
            .refs
            .find_branch(branch)
            .map(|(_, oid)| oid.clone())
            .ok_or_else(|| RepositoryError::BranchNotFound(branch.to_string()))?;

        if target_tip == head {
            return Err(RepositoryError::AlreadyUpToDate(branch.to_string()));
        }

        let base = lowest_common_ancestor(&self.database, &head, &target_tip);

        if base.as_ref() == Some(&head) {
            let snapshot = self.load_commit(&target_tip)?.snapshot().clone();
            self.refs.update_head(target_tip.clone());
            self.check_out_snapshot(snapshot);

            info!(branch, oid = %target_tip, "fast-forwarded");
            return Ok(RebaseOutcome {
                head: target_tip,
                fast_forward: true,
                replayed: Vec::new(),
            });
        }

        if base.as_ref() == Some(&target_tip) {
            return Err(RepositoryError::AlreadyUpToDate(branch.to_string()));
        }

        let mut to_replay = RevList::new(&self.database, Some(&head))
            .iter()
            .take_while(|commit| !is_ancestor(&self.database, commit.id(), &target_tip))
            .map(|commit| commit.id().clone())
            .collect::<Vec<_>>();
        to_replay.reverse();

        let mut tip = target_tip;
        let mut replayed = Vec::with_capacity(to_replay.len());

        for original in to_replay {
            let commit = self.load_commit(&original)?;
            let ancestor = match commit.parent() {
                Some(parent) => Some(self.load_commit(parent)?.snapshot()),
                None => None,
            };
            let ours = self.load_commit(&tip)?.snapshot();
            let result = replay_merge(ours, commit.snapshot(), ancestor);
            let message = commit.message().to_string();

            let conflicts = result
                .conflicts
                .into_iter()
                .map(|conflict| conflict.path)
                .collect::<Vec<_>>();
            for path in &conflicts {
                warn!(commit = %original.to_short_oid(), path = %path, "conflict while replaying, keeping new base content");
            }

            let new_tip =
                self.database
                    .create_commit(vec![tip], &message, result.merged, current.as_ref());
            debug!(from = %original, to = %new_tip, "replayed commit");

            replayed.push(ReplayedCommit {
                original,
                replayed: new_tip.clone(),
                conflicts,
            });
            tip = new_tip;
        }

        let snapshot = self.load_commit(&tip)?.snapshot().clone();
        self.refs.update_head(tip.clone());
        self.check_out_snapshot(snapshot);

        info!(branch, oid = %tip, replayed = replayed.len(), "rebased");

        Ok(RebaseOutcome {
            head: tip,
            fast_forward: false,
            replayed,
        })
    }
}
