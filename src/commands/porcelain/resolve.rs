use crate::areas::repository::Repository;
use crate::error::{RepositoryError, Result};
use tracing::info;

impl Repository {
    /// Settle the open conflict by writing `content` to its path
    ///
    /// The path is staged. A pending merge stays until the next commit, which
    /// becomes the merge commit. Returns the resolved path.
    pub fn resolve_conflict(&mut self, content: &str) -> Result<String> {
        let conflict = self.conflict.take().ok_or(RepositoryError::NoConflict)?;

        self.workspace.write_file(&conflict.path, content);
        self.index.add(&conflict.path);

        info!(path = %conflict.path, "resolved conflict");

        Ok(conflict.path)
    }
}
