//! Merging histories
//!
//! - `bca_finder`: merge base selection
//! - `three_way`: per-path snapshot merge
//! - `conflict`: conflict and interrupted-merge records

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::CommitId;

pub mod bca_finder;
pub mod conflict;
pub mod three_way;

/// Merge base of two commits in the object store
pub fn lowest_common_ancestor(database: &Database, a: &CommitId, b: &CommitId) -> Option<CommitId> {
    bca_finder::BCAFinder::new(|oid| database.load_slim(oid)).find_best_common_ancestor(a, b)
}

/// Default message of a merge commit
pub fn merge_message(other: &impl std::fmt::Display, current: &str) -> String {
    format!("Merge branch '{other}' into {current}")
}
