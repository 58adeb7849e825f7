//! Commit history traversal
//!
//! - `ancestors`: breadth-first walks over every parent, used for
//!   reachability and merge-base tie-breaking
//! - `rev_list`: the first-parent linear history shown by `git log`

pub mod ancestors;
pub mod rev_list;
