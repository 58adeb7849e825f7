//! Commit identifier (SHA-1 content hash)
//!
//! Commit IDs are 40-character hexadecimal strings. They are derived from the
//! commit's parents, message and snapshot, so the same commit built twice gets
//! the same ID.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: First 7 characters (e.g., "abc1234")

use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHORT_ID_LENGTH};
use crate::error::RepositoryError;
use serde::Serialize;

/// Commit identifier
///
/// A 40-character lowercase hexadecimal string that uniquely identifies a
/// commit in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Parse and validate a commit ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated CommitId or `InvalidObjectId` if the length or characters are wrong
    pub fn try_parse(id: impl Into<String>) -> Result<Self, RepositoryError> {
        let id = id.into();
        if id.len() != OBJECT_ID_LENGTH {
            return Err(RepositoryError::InvalidObjectId(id));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RepositoryError::InvalidObjectId(id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Wrap the lowercase hex rendering of a finished SHA-1 digest
    pub(crate) fn from_hex_digest(hex40: String) -> Self {
        debug_assert_eq!(hex40.len(), OBJECT_ID_LENGTH);
        Self(hex40)
    }

    /// Get abbreviated form of the commit ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash (standard Git abbreviation)
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(SHORT_ID_LENGTH).0.to_string()
    }

    /// Whether this ID starts with the given (non-empty) prefix
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.0.starts_with(&prefix.to_ascii_lowercase())
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
