//! Working tree status
//!
//! Compares the working tree and the staging index against the HEAD commit.
//!
//! - `file_change`: change categories and their rendering
//! - `status_info`: the comparison itself

pub mod file_change;
pub mod status_info;
