//! In-memory git repository simulator
//!
//! A repository is an owned aggregate of an append-only commit store, branch
//! references with HEAD, a working tree and a staging set. Operations
//! (commit, checkout, branch, merge, rebase, cherry-pick, reset) are methods on
//! [`areas::repository::Repository`]; each either applies completely or is
//! rejected with a [`error::RepositoryError`] and leaves the state untouched.
//!
//! ```
//! use bitsim::areas::repository::Repository;
//! use bitsim::config::RepositoryConfig;
//!
//! let mut repository = Repository::initialized(RepositoryConfig::default()).unwrap();
//! repository.edit_file("a.txt", "x");
//! repository.stage_file(".").unwrap();
//! let oid = repository.commit("first").unwrap();
//!
//! assert_eq!(repository.refs().read_head(), Some(oid));
//! assert_eq!(repository.database().len(), 2);
//! ```

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod error;
