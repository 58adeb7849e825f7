use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::RefLookup;
use crate::commands::porcelain::merge::MergeOutcome;
use crate::error::{RepositoryError, Result};
use tracing::info;

/// Exact IDs first, then the oldest ID prefix match, then branches
const CHERRY_PICK_LOOKUP: [RefLookup; 3] =
    [RefLookup::ExactId, RefLookup::IdPrefix, RefLookup::Branch];

impl Repository {
    /// Apply the change one commit made, relative to its first parent, on
    /// top of HEAD as a new single-parent commit with the same message
    ///
    /// On conflict nothing is committed and no merge is left pending: the
    /// commit that resolves it has HEAD as its only parent.
    pub fn cherry_pick(&mut self, revision: &str) -> Result<MergeOutcome> {
        let current = self.require_attached("cherry-pick")?;
        self.require_no_merge()?;
        let head = self.require_head()?;
        let resolved = self.revisions().resolve(revision, &CHERRY_PICK_LOOKUP)?;

        let picked = self.load_commit(&resolved.oid)?;
        let parent = picked
            .parent()
            .ok_or_else(|| RepositoryError::RootCommitCherryPick(resolved.oid.to_short_oid()))?;
        let ancestor = self.load_commit(parent)?.snapshot().clone();
        let theirs = picked.snapshot().clone();
        let message = picked.message().to_string();

        let merge = self.merge_onto_head("cherry-pick", &theirs, Some(&ancestor))?;

        if let Some(conflict) = merge.commit.conflict {
            self.stop_on_conflict(merge.working_tree, conflict.clone());

            info!(revision, path = %conflict.path, "cherry-pick stopped on conflict");
            return Ok(MergeOutcome::Conflicted(conflict));
        }

        let oid = self.database.create_commit(
            vec![head],
            &message,
            merge.commit.merged,
            current.as_ref(),
        );
        self.refs.update_head(oid.clone());
        self.check_out_snapshot(merge.working_tree);

        info!(revision, from = %resolved.oid, oid = %oid, "cherry-picked");

        Ok(MergeOutcome::Committed(oid))
    }
}
