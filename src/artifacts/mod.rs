//! Repository data structures and algorithms
//!
//! - `branch`: Branch names and revision parsing
//! - `log`: Commit history traversal
//! - `merge`: Merge base selection, three-way merge and conflict records
//! - `objects`: Commit IDs, commits and snapshots
//! - `status`: Working tree status inspection

pub mod branch;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
