use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::merge::conflict::{Conflict, PendingMerge};
use crate::artifacts::objects::Snapshot;
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use derive_new::new;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub type ChangeSet = BTreeMap<String, FileChangeType>;
pub type FileSet = BTreeSet<String>;

/// Result of comparing the working tree and staging against HEAD
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub(crate) head: Head,
    pub(crate) changed_files: BTreeMap<String, FileChange>,
    pub(crate) untracked_files: FileSet,
    #[serde(skip)]
    pub(crate) workspace_changeset: ChangeSet,
    #[serde(skip)]
    pub(crate) index_changeset: ChangeSet,
    pub(crate) conflict: Option<Conflict>,
    pub(crate) pending_merge: Option<PendingMerge>,
}

impl StatusInfo {
    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn changed_files(&self) -> &BTreeMap<String, FileChange> {
        &self.changed_files
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }

    /// Staged changes, "Changes to be committed"
    pub fn index_changeset(&self) -> &ChangeSet {
        &self.index_changeset
    }

    /// Unstaged changes to known paths, "Changes not staged for commit"
    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn conflict(&self) -> Option<&Conflict> {
        self.conflict.as_ref()
    }

    pub fn pending_merge(&self) -> Option<&PendingMerge> {
        self.pending_merge.as_ref()
    }

    /// Nothing staged, nothing modified, nothing untracked
    pub fn is_clean(&self) -> bool {
        self.changed_files.is_empty() && self.untracked_files.is_empty()
    }
}

/// Status computation over a repository
///
/// Staged paths are classified by comparing the working tree against HEAD;
/// every other path that differs from HEAD is an unstaged change.
#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    pub fn initialize(&self) -> StatusInfo {
        let head_snapshot = self.repository.head_snapshot();
        let files = self.repository.workspace().files();
        let staged = self.repository.index().entries();

        let mut changed_files = BTreeMap::<String, FileChange>::new();
        let mut untracked_files = FileSet::new();

        let paths = files.keys().chain(head_snapshot.keys()).collect::<BTreeSet<_>>();

        for path in paths {
            if staged.contains(path) {
                let change = Self::check_index_entry(path, files, &head_snapshot);
                if change != IndexChangeType::None {
                    changed_files.entry(path.clone()).or_default().index_change = change;
                }
                continue;
            }

            match Self::check_workspace_entry(path, files, &head_snapshot) {
                WorkspaceChangeType::None => {}
                WorkspaceChangeType::Untracked => {
                    untracked_files.insert(path.clone());
                    changed_files.entry(path.clone()).or_default().workspace_change =
                        WorkspaceChangeType::Untracked;
                }
                change => {
                    changed_files.entry(path.clone()).or_default().workspace_change = change;
                }
            }
        }

        let workspace_changeset = changed_files
            .iter()
            .filter(|(_, change)| {
                !matches!(
                    change.workspace_change,
                    WorkspaceChangeType::None | WorkspaceChangeType::Untracked
                )
            })
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Workspace(change.workspace_change.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();
        let index_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Index(change.index_change.clone()),
                )
            })
            .collect::<BTreeMap<_, _>>();

        StatusInfo {
            head: self.repository.refs().head().clone(),
            changed_files,
            untracked_files,
            workspace_changeset,
            index_changeset,
            conflict: self.repository.conflict().cloned(),
            pending_merge: self.repository.pending_merge().cloned(),
        }
    }

    fn check_index_entry(path: &str, files: &Snapshot, head: &Snapshot) -> IndexChangeType {
        match (files.get(path), head.get(path)) {
            (Some(_), None) => IndexChangeType::Added,
            (None, Some(_)) => IndexChangeType::Deleted,
            (Some(current), Some(committed)) if current != committed => IndexChangeType::Modified,
            _ => IndexChangeType::None,
        }
    }

    fn check_workspace_entry(path: &str, files: &Snapshot, head: &Snapshot) -> WorkspaceChangeType {
        match (files.get(path), head.get(path)) {
            (Some(_), None) => WorkspaceChangeType::Untracked,
            (None, Some(_)) => WorkspaceChangeType::Deleted,
            (Some(current), Some(committed)) if current != committed => {
                WorkspaceChangeType::Modified
            }
            _ => WorkspaceChangeType::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepositoryConfig;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[derive(Debug, Clone, Copy)]
    enum Touch {
        Write(&'static str, &'static str),
        Remove(&'static str),
    }

    /// One commit on top of the root, adding tracked.txt
    #[fixture]
    fn repository() -> Repository {
        let mut repository = Repository::initialized(RepositoryConfig::default()).unwrap();
        repository.edit_file("tracked.txt", "v1");
        repository.stage_file("tracked.txt").unwrap();
        repository.commit("add tracked.txt").unwrap();
        repository
    }

    #[rstest]
    #[case::staged_new_file(Touch::Write("new.txt", "n"), Some("new.txt"), "new.txt", "A ")]
    #[case::staged_modification(Touch::Write("tracked.txt", "v2"), Some("tracked.txt"), "tracked.txt", "M ")]
    #[case::staged_deletion(Touch::Remove("tracked.txt"), Some("."), "tracked.txt", "D ")]
    #[case::unstaged_modification(Touch::Write("tracked.txt", "v2"), None, "tracked.txt", " M")]
    #[case::unstaged_deletion(Touch::Remove("tracked.txt"), None, "tracked.txt", " D")]
    #[case::untracked(Touch::Write("new.txt", "n"), None, "new.txt", "??")]
    fn classifies_each_change(
        mut repository: Repository,
        #[case] touch: Touch,
        #[case] pathspec: Option<&str>,
        #[case] path: &str,
        #[case] code: &str,
    ) {
        match touch {
            Touch::Write(path, content) => repository.edit_file(path, content),
            Touch::Remove(path) => {
                repository.workspace.remove_file(path);
            }
        }
        if let Some(pathspec) = pathspec {
            repository.stage_file(pathspec).unwrap();
        }

        let status = repository.status();

        let codes = status
            .changed_files()
            .iter()
            .map(|(path, change)| (path.as_str(), change.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(codes, vec![(path, code.to_string())]);
        assert!(!status.is_clean());
    }

    #[rstest]
    fn staged_deletion_is_listed_as_to_be_committed(mut repository: Repository) {
        repository.workspace.remove_file("tracked.txt");
        let staged = repository.stage_file(".").unwrap();

        let status = repository.status();

        assert!(staged.contains(&"tracked.txt".to_string()));
        assert_eq!(
            status.index_changeset().get("tracked.txt"),
            Some(&FileChangeType::Index(IndexChangeType::Deleted))
        );
        assert!(status.workspace_changeset().is_empty());
        assert!(status.untracked_files().is_empty());
    }

    #[rstest]
    fn untracked_files_stay_out_of_the_changesets(mut repository: Repository) {
        repository.edit_file("new.txt", "n");

        let status = repository.status();

        assert_eq!(
            status.untracked_files().iter().collect::<Vec<_>>(),
            vec!["new.txt"]
        );
        assert!(status.index_changeset().is_empty());
        assert!(status.workspace_changeset().is_empty());
    }

    #[rstest]
    fn committed_state_is_clean(repository: Repository) {
        assert!(repository.status().is_clean());
    }
}
