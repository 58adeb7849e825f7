//! Repository error types
//!
//! Every user-facing failure of a repository operation is a precondition
//! failure: it is detected before any state is touched, so the repository
//! stays valid and inspectable after a rejected operation.

use thiserror::Error;

/// Errors returned by repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The named branch does not exist.
    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    /// A branch with this name already exists.
    #[error("a branch named '{0}' already exists")]
    BranchAlreadyExists(String),

    /// The branch name violates ref naming rules.
    #[error("'{0}' is not a valid branch name")]
    InvalidBranchName(String),

    /// Neither a branch, an exact commit id nor an id prefix matched.
    #[error("pathspec '{0}' did not match any branch or commit")]
    TargetNotFound(String),

    /// The operation needs HEAD attached to a branch.
    #[error("cannot {0} in detached HEAD state")]
    DetachedHeadForbidden(&'static str),

    /// Merging a branch whose tip is HEAD itself.
    #[error("cannot merge '{0}' into itself")]
    SelfMergeNoop(String),

    /// Nothing staged and no merge waiting for its commit.
    #[error("nothing to commit, working tree clean")]
    NothingToCommit,

    /// A merge or cherry-pick stopped on a conflict that is still open.
    #[error("unresolved conflict in '{0}'")]
    ConflictUnresolved(String),

    /// A resolution was supplied while no conflict is open.
    #[error("no conflict to resolve")]
    NoConflict,

    /// A merge is waiting for its resolving commit.
    #[error("a merge is in progress; commit the resolution first")]
    MergeInProgress,

    /// An uncommitted edit sits on a path the merge would rewrite.
    #[error("your local changes to '{0}' would be overwritten by {1}")]
    LocalChangesOverwritten(String, &'static str),

    /// The root commit has no parent to compute its change against.
    #[error("cannot cherry-pick root commit {0}")]
    RootCommitCherryPick(String),

    /// Rebase target is already contained in the current history.
    #[error("current branch is up to date with '{0}'")]
    AlreadyUpToDate(String),

    /// The repository has no commits yet.
    #[error("repository has no commits; run init first")]
    Unborn,

    /// A regular commit needs a message.
    #[error("aborting commit due to empty commit message")]
    EmptyCommitMessage,

    /// The path exists neither in the working tree nor in HEAD.
    #[error("pathspec '{0}' did not match any files")]
    PathNotFound(String),

    /// The text is not a well-formed commit id.
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
