//! Porcelain commands (user-facing repository operations)
//!
//! Each command is an `impl Repository` block. Commands check every
//! precondition before touching state, so a rejected command changes nothing.
//!
//! ## Commands
//!
//! - `init`: Start over with a single root commit
//! - `add`: Edit and stage files
//! - `commit`: Record staged changes
//! - `branch`: Create and list branches
//! - `checkout`: Switch branches or detach at a commit
//! - `merge`: Merge a branch into the current one
//! - `resolve`: Settle a merge or cherry-pick conflict
//! - `rebase`: Replay the current branch onto another
//! - `cherry_pick`: Copy one commit's change onto HEAD
//! - `reset`: Move the current branch, optionally discarding history
//! - `log`: First-parent history

pub mod add;
pub mod branch;
pub mod checkout;
pub mod cherry_pick;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod rebase;
pub mod reset;
pub mod resolve;
