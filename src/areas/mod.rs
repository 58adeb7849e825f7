//! Mutable areas of a repository
//!
//! - `database`: Object store of immutable commits
//! - `refs`: Branches and HEAD
//! - `workspace`: Working tree file map
//! - `index`: Staging set
//! - `repository`: The aggregate owning all of the above
//! - `shared`: Lock-guarded handle for concurrent callers

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod shared;
pub mod workspace;
