use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::RefLookup;
use crate::artifacts::log::ancestors::reachable_from;
use crate::artifacts::objects::object_id::CommitId;
use serde::Serialize;
use std::str::FromStr;
use tracing::info;

/// Exact IDs first, then branches, then the oldest ID prefix match
const RESET_LOOKUP: [RefLookup; 3] = [RefLookup::ExactId, RefLookup::Branch, RefLookup::IdPrefix];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResetMode {
    /// Move the branch only
    Soft,
    /// Move the branch, overwrite working tree and staging, collect garbage
    Hard,
}

impl FromStr for ResetMode {
    type Err = String;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "--soft" | "soft" => Ok(ResetMode::Soft),
            "--hard" | "hard" => Ok(ResetMode::Hard),
            _ => Err(format!("unknown reset mode '{mode}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub oid: CommitId,
    /// Commits dropped by garbage collection
    pub collected: usize,
}

impl Repository {
    /// Move the current branch to `target`
    ///
    /// A hard reset abandons a stopped merge. A soft reset would leave it
    /// pointing at the old HEAD, so it is refused until the merge is settled.
    pub fn reset(&mut self, mode: ResetMode, target: &str) -> crate::error::Result<ResetOutcome> {
        self.require_attached("reset")?;
        if mode == ResetMode::Soft {
            self.require_no_merge()?;
        }
        let resolved = self.revisions().resolve(target, &RESET_LOOKUP)?;
        let snapshot = self.load_commit(&resolved.oid)?.snapshot().clone();

        self.refs.update_head(resolved.oid.clone());

        let collected = match mode {
            ResetMode::Soft => 0,
            ResetMode::Hard => {
                self.check_out_snapshot(snapshot);
                self.conflict = None;
                self.pending_merge = None;

                // Ref set is read after the move
                let reachable = reachable_from(&self.database, &self.refs.tips());
                self.database.retain_reachable(&reachable)
            }
        };

        info!(?mode, oid = %resolved.oid, collected, "reset");

        Ok(ResetOutcome {
            oid: resolved.oid,
            collected,
        })
    }
}
