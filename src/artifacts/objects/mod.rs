//! Commit objects
//!
//! The object store only holds commits. Each commit carries the complete
//! working tree it recorded as a [`Snapshot`] (path -> full file content), so
//! there are no separate blob or tree objects.
//!
//! - **CommitId**: SHA-1 of parents, message and snapshot
//! - **Commit**: Snapshot with metadata (message, parents, branch label, timestamp)

use std::collections::BTreeMap;

pub mod commit;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of an abbreviated commit ID
pub const SHORT_ID_LENGTH: usize = 7;

/// Complete file map of a working tree, ordered by path
pub type Snapshot = BTreeMap<String, String>;
