//! Commit object
//!
//! Commits are immutable snapshots of the working tree at a point in history.
//! They contain:
//! - Parent commit ID(s) (zero for the root, two for merges)
//! - The complete file snapshot
//! - Commit message
//! - A cosmetic branch label and creation timestamp
//! - A generation number (1 for the root, otherwise one more than the
//!   highest parent generation)
//!
//! ## Identity
//!
//! The ID hashes a canonical text form of the parents, message and snapshot:
//! ```text
//! parent <parent-sha>
//! salt <n>                 (only when n > 0)
//! message <byte-len>
//! <message>
//! file <path-len> <content-len>
//! <path><content>
//! ```
//! Timestamp and branch label are not part of the ID.

use crate::artifacts::objects::Snapshot;
use crate::artifacts::objects::object_id::CommitId;
use derive_new::new;
use serde::Serialize;
use sha1::{Digest, Sha1};

/// Slim representation of a commit
///
/// Contains only what graph walks need: the ID, the parents and the
/// generation number used to order the walk.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SlimCommit<'c> {
    /// The commit's ID
    pub oid: &'c CommitId,
    /// The commit's parent IDs
    pub parents: &'c [CommitId],
    /// Topological generation (parents always have a lower one)
    pub generation: u32,
}

/// The hashed part of a commit
///
/// Borrowed view used to compute a commit ID before the commit exists.
#[derive(Debug, Clone, Copy, new)]
pub struct CommitContent<'a> {
    parents: &'a [CommitId],
    message: &'a str,
    snapshot: &'a Snapshot,
}

impl CommitContent<'_> {
    pub fn serialize(&self, salt: u32) -> Vec<u8> {
        let mut content = Vec::new();

        for parent in self.parents {
            content.extend_from_slice(format!("parent {}\n", parent.as_ref()).as_bytes());
        }
        if salt > 0 {
            content.extend_from_slice(format!("salt {salt}\n").as_bytes());
        }
        content.extend_from_slice(format!("message {}\n", self.message.len()).as_bytes());
        content.extend_from_slice(self.message.as_bytes());
        content.push(b'\n');
        for (path, data) in self.snapshot {
            content.extend_from_slice(format!("file {} {}\n", path.len(), data.len()).as_bytes());
            content.extend_from_slice(path.as_bytes());
            content.extend_from_slice(data.as_bytes());
        }

        content
    }

    pub fn object_id(&self, salt: u32) -> CommitId {
        let mut hasher = Sha1::new();
        hasher.update(self.serialize(salt));

        CommitId::from_hex_digest(format!("{:x}", hasher.finalize()))
    }

    /// Whether an existing commit records exactly this content
    pub fn same_content_as(&self, commit: &Commit) -> bool {
        commit.parents == self.parents
            && commit.message == self.message
            && &commit.snapshot == self.snapshot
    }
}

/// Commit object
///
/// Immutable once created. Only the object store creates commits.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, new)]
#[serde(rename_all = "camelCase")]
#[new(visibility = "pub(crate)")]
pub struct Commit {
    id: CommitId,
    /// Parent commit IDs (empty for the root, two for merge commits)
    #[serde(rename = "parentIds")]
    parents: Vec<CommitId>,
    message: String,
    /// Branch the commit was authored on, for rendering only
    branch_label: String,
    snapshot: Snapshot,
    generation: u32,
    #[new(value = "chrono::Utc::now()")]
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl Commit {
    pub fn id(&self) -> &CommitId {
        &self.id
    }

    pub fn parents(&self) -> &[CommitId] {
        &self.parents
    }

    /// First parent, the one the linear history follows
    pub fn parent(&self) -> Option<&CommitId> {
        self.parents.first()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn branch_label(&self) -> &str {
        &self.branch_label
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::Utc> {
        self.timestamp
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn as_slim(&self) -> SlimCommit<'_> {
        SlimCommit {
            oid: &self.id,
            parents: &self.parents,
            generation: self.generation,
        }
    }
}
