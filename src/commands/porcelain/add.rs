use crate::areas::repository::Repository;
use crate::error::{RepositoryError, Result};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Pathspec that stages everything
pub const STAGE_ALL: &str = ".";

impl Repository {
    /// Write a file in the working tree without staging it
    pub fn edit_file(&mut self, path: &str, content: &str) {
        debug!(path, bytes = content.len(), "editing file");
        self.workspace.write_file(path, content);
    }

    /// Stage a path, or every change with `.`
    ///
    /// `.` covers every working tree path plus the HEAD paths missing from the
    /// working tree, so deletions get recorded too. Returns the staged paths.
    pub fn stage_file(&mut self, pathspec: &str) -> Result<Vec<String>> {
        let head_snapshot = self.head_snapshot();

        let paths = if pathspec == STAGE_ALL {
            self.workspace
                .list_files()
                .chain(head_snapshot.keys().map(String::as_str))
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
        } else if self.workspace.contains(pathspec) || head_snapshot.contains_key(pathspec) {
            BTreeSet::from([pathspec.to_string()])
        } else {
            return Err(RepositoryError::PathNotFound(pathspec.to_string()));
        };

        self.index.add_all(paths.iter().map(String::as_str));
        info!(count = paths.len(), pathspec, "staged paths");

        Ok(paths.into_iter().collect())
    }
}
