use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::{Head, Refs};
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::RevisionContext;
use crate::artifacts::merge::conflict::{Conflict, PendingMerge};
use crate::artifacts::objects::Snapshot;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::CommitId;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Branch label given to a root commit made on a detached HEAD
const DETACHED_LABEL: &str = "detached";

/// The whole repository state
///
/// Owns every area. Operations are `impl Repository` blocks under
/// `commands::porcelain`; each one checks all of its preconditions before
/// touching any area, so a rejected operation leaves the state as it was.
#[derive(Debug, Clone)]
pub struct Repository {
    config: RepositoryConfig,
    default_branch: BranchName,
    pub(crate) database: Database,
    pub(crate) refs: Refs,
    pub(crate) workspace: Workspace,
    pub(crate) index: Index,
    pub(crate) conflict: Option<Conflict>,
    pub(crate) pending_merge: Option<PendingMerge>,
}

impl Repository {
    /// Empty repository with no commits; HEAD sits on the unborn default branch
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        let default_branch = config.default_branch_name()?;

        Ok(Repository {
            config,
            refs: Refs::new(default_branch.clone()),
            default_branch,
            database: Database::new(),
            workspace: Workspace::new(),
            index: Index::new(),
            conflict: None,
            pending_merge: None,
        })
    }

    /// Repository with the root commit already created
    pub fn initialized(config: RepositoryConfig) -> Result<Self> {
        let mut repository = Self::new(config)?;
        repository.init();
        Ok(repository)
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn default_branch(&self) -> &BranchName {
        &self.default_branch
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn conflict(&self) -> Option<&Conflict> {
        self.conflict.as_ref()
    }

    pub fn pending_merge(&self) -> Option<&PendingMerge> {
        self.pending_merge.as_ref()
    }

    pub fn status(&self) -> StatusInfo {
        Status::new(self).initialize()
    }

    pub fn head_commit(&self) -> Option<&Commit> {
        self.refs
            .read_head()
            .and_then(|oid| self.database.load(&oid))
    }

    /// Snapshot of the HEAD commit, empty while unborn
    pub fn head_snapshot(&self) -> Snapshot {
        self.head_commit()
            .map(|commit| commit.snapshot().clone())
            .unwrap_or_default()
    }

    pub(crate) fn revisions(&self) -> RevisionContext<'_> {
        RevisionContext::new(&self.database, &self.refs)
    }

    pub(crate) fn require_head(&self) -> Result<CommitId> {
        self.refs.read_head().ok_or(RepositoryError::Unborn)
    }

    /// Current branch, failing on a detached HEAD
    pub(crate) fn require_attached(&self, operation: &'static str) -> Result<BranchName> {
        self.refs
            .current_branch()
            .cloned()
            .ok_or(RepositoryError::DetachedHeadForbidden(operation))
    }

    pub(crate) fn require_no_conflict(&self) -> Result<()> {
        match &self.conflict {
            Some(conflict) => Err(RepositoryError::ConflictUnresolved(conflict.path.clone())),
            None => Ok(()),
        }
    }

    /// Reject history-rewriting operations while a merge waits for its commit
    pub(crate) fn require_no_merge(&self) -> Result<()> {
        self.require_no_conflict()?;
        match self.pending_merge {
            Some(_) => Err(RepositoryError::MergeInProgress),
            None => Ok(()),
        }
    }

    pub(crate) fn load_commit(&self, oid: &CommitId) -> Result<&Commit> {
        self.database
            .load(oid)
            .ok_or_else(|| RepositoryError::TargetNotFound(oid.to_string()))
    }

    /// Label for a commit about to be created on top of HEAD
    pub(crate) fn branch_label(&self) -> String {
        match self.refs.current_branch() {
            Some(branch_name) => branch_name.to_string(),
            None => self
                .head_commit()
                .map(|commit| commit.branch_label().to_string())
                .unwrap_or_else(|| DETACHED_LABEL.to_string()),
        }
    }

    /// Replace working tree with a commit's snapshot and drop staging
    pub(crate) fn check_out_snapshot(&mut self, snapshot: Snapshot) {
        self.workspace.replace(snapshot);
        self.index.clear();
    }

    /// Stage every path where the working tree differs from HEAD
    pub(crate) fn stage_differences_from_head(&mut self) {
        let head_snapshot = self.head_snapshot();
        let files = self.workspace.files();
        let changed = files
            .keys()
            .chain(head_snapshot.keys())
            .filter(|path| files.get(*path) != head_snapshot.get(*path))
            .cloned()
            .collect::<BTreeSet<_>>();

        self.index.add_all(changed.iter().map(String::as_str));
    }

    /// Immutable copy of everything a renderer needs
    pub fn snapshot(&self) -> RepositorySnapshot {
        RepositorySnapshot {
            commits: self.database.iter().cloned().collect(),
            branches: self
                .refs
                .list_branches()
                .map(|(name, oid)| (name.clone(), oid.clone()))
                .collect(),
            head: self.refs.head().clone(),
            working_tree: self.workspace.files().clone(),
            staging: self.index.entries().clone(),
            conflict: self.conflict.clone(),
            pending_merge: self.pending_merge.clone(),
        }
    }
}

/// Point-in-time copy of the repository state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot {
    /// All commits in creation order
    pub commits: Vec<Commit>,
    pub branches: BTreeMap<BranchName, CommitId>,
    pub head: Head,
    pub working_tree: Snapshot,
    pub staging: BTreeSet<String>,
    pub conflict: Option<Conflict>,
    pub pending_merge: Option<PendingMerge>,
}

impl RepositorySnapshot {
    pub fn head_commit_id(&self) -> Option<&CommitId> {
        match &self.head {
            Head::Attached(branch_name) => self.branches.get(branch_name),
            Head::Detached(oid) => Some(oid),
        }
    }
}
