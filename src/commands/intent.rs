//! Request/response surface
//!
//! Front ends send an [`Intent`] and get back an [`Outcome`]; the state they
//! render comes from [`Repository::snapshot`].

use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::CommitId;
use crate::commands::porcelain::merge::MergeOutcome;
use crate::commands::porcelain::rebase::RebaseOutcome;
use crate::commands::porcelain::reset::{ResetMode, ResetOutcome};
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    Init,
    Commit { message: String },
    Checkout { target: String },
    CreateBranch { name: String },
    Merge { branch: String },
    Rebase { branch: String },
    CherryPick { revision: String },
    Reset { mode: ResetMode, target: String },
    EditFile { path: String, content: String },
    StageFile { pathspec: String },
    ResolveConflict { content: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Outcome {
    Initialized(CommitId),
    Committed(CommitId),
    CheckedOut(Head),
    BranchCreated(BranchName),
    Merged(MergeOutcome),
    Rebased(RebaseOutcome),
    CherryPicked(MergeOutcome),
    Reset(ResetOutcome),
    Edited(String),
    Staged(Vec<String>),
    Resolved(String),
}

impl Repository {
    /// Run one intent
    pub fn apply(&mut self, intent: Intent) -> Result<Outcome> {
        match intent {
            Intent::Init => Ok(Outcome::Initialized(self.init())),
            Intent::Commit { message } => self.commit(&message).map(Outcome::Committed),
            Intent::Checkout { target } => self.checkout(&target).map(Outcome::CheckedOut),
            Intent::CreateBranch { name } => {
                self.create_branch(&name).map(Outcome::BranchCreated)
            }
            Intent::Merge { branch } => self.merge(&branch).map(Outcome::Merged),
            Intent::Rebase { branch } => self.rebase(&branch).map(Outcome::Rebased),
            Intent::CherryPick { revision } => {
                self.cherry_pick(&revision).map(Outcome::CherryPicked)
            }
            Intent::Reset { mode, target } => self.reset(mode, &target).map(Outcome::Reset),
            Intent::EditFile { path, content } => {
                self.edit_file(&path, &content);
                Ok(Outcome::Edited(path))
            }
            Intent::StageFile { pathspec } => self.stage_file(&pathspec).map(Outcome::Staged),
            Intent::ResolveConflict { content } => {
                self.resolve_conflict(&content).map(Outcome::Resolved)
            }
        }
    }
}
