use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::CommitId;
use tracing::info;

impl Repository {
    /// Start over with a single root commit on the default branch
    ///
    /// Every existing commit, branch and piece of working state is dropped.
    pub fn init(&mut self) -> CommitId {
        let default_branch = self.default_branch().clone();
        let message = self.config().initial_message.clone();
        let files = self.config().initial_files.clone();

        self.database.clear();
        self.refs.clear(default_branch.clone());
        self.index.clear();
        self.conflict = None;
        self.pending_merge = None;

        let root = self
            .database
            .create_commit(vec![], &message, files.clone(), default_branch.as_ref());
        self.refs.update_head(root.clone());
        self.workspace.replace(files);

        info!(oid = %root, branch = %default_branch, "initialized repository");

        root
    }
}
