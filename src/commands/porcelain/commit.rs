use crate::areas::repository::Repository;
use crate::artifacts::merge::merge_message;
use crate::artifacts::objects::Snapshot;
use crate::artifacts::objects::object_id::CommitId;
use crate::error::{RepositoryError, Result};
use tracing::info;

impl Repository {
    /// Record staged changes as a new commit on top of HEAD
    ///
    /// While a merge is pending the commit takes the whole working tree, gets
    /// the merged commit as second parent, and may be made with nothing staged
    /// or with a blank message.
    pub fn commit(&mut self, message: &str) -> Result<CommitId> {
        self.require_no_conflict()?;
        let head = self.require_head()?;

        if self.index.is_empty() && self.pending_merge.is_none() {
            return Err(RepositoryError::NothingToCommit);
        }

        let message = match (message.trim(), &self.pending_merge) {
            ("", Some(pending_merge)) => {
                merge_message(&pending_merge.other_branch_name, &self.branch_label())
            }
            ("", None) => return Err(RepositoryError::EmptyCommitMessage),
            (message, _) => message.to_string(),
        };

        let (parents, snapshot) = match &self.pending_merge {
            Some(pending_merge) => (
                vec![head, pending_merge.other_commit_id.clone()],
                self.workspace.files().clone(),
            ),
            None => (vec![head], self.staged_snapshot()),
        };

        let branch_label = self.branch_label();
        let oid = self
            .database
            .create_commit(parents, &message, snapshot, &branch_label);
        self.refs.update_head(oid.clone());
        self.index.clear();
        self.pending_merge = None;

        info!(oid = %oid, message = %message, "created commit");

        Ok(oid)
    }

    /// HEAD's snapshot with every staged path taken from the working tree
    fn staged_snapshot(&self) -> Snapshot {
        let mut snapshot = self.head_snapshot();

        for path in self.index.entries() {
            match self.workspace.read_file(path) {
                Some(content) => snapshot.insert(path.clone(), content.to_string()),
                None => snapshot.remove(path),
            };
        }

        snapshot
    }
}
