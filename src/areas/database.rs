//! Object store
//!
//! Append-only store of commits keyed by ID. Commits are never mutated; the
//! only way one disappears is garbage collection after a hard reset, which
//! drops every commit no branch or HEAD can reach any more.

use crate::artifacts::objects::Snapshot;
use crate::artifacts::objects::commit::{Commit, CommitContent, SlimCommit};
use crate::artifacts::objects::object_id::CommitId;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Database {
    commits: HashMap<CommitId, Commit>,
    /// Creation order, used for listing and prefix lookups
    order: Vec<CommitId>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new commit and return its ID
    ///
    /// The ID is the content hash of parents, message and snapshot. Storing
    /// content that already exists returns the existing ID. A hash collision
    /// with different content is resolved by re-hashing with an increasing salt.
    ///
    /// # Panics
    ///
    /// If a parent ID is not in the store. Commit-producing operations always
    /// resolve parents from live refs, so a missing parent is a bug.
    pub fn create_commit(
        &mut self,
        parents: Vec<CommitId>,
        message: &str,
        snapshot: Snapshot,
        branch_label: &str,
    ) -> CommitId {
        for parent in &parents {
            assert!(
                self.commits.contains_key(parent),
                "parent commit {parent} is missing from the object store"
            );
        }

        let content = CommitContent::new(&parents, message, &snapshot);
        let mut salt = 0;
        let oid = loop {
            let candidate = content.object_id(salt);
            match self.commits.get(&candidate) {
                Some(existing) if content.same_content_as(existing) => {
                    debug!(oid = %candidate, "commit already stored, reusing it");
                    return candidate;
                }
                Some(_) => salt += 1,
                None => break candidate,
            }
        };

        let generation = parents
            .iter()
            .filter_map(|parent| self.commits.get(parent))
            .map(Commit::generation)
            .max()
            .unwrap_or(0)
            + 1;

        let commit = Commit::new(
            oid.clone(),
            parents,
            message.to_string(),
            branch_label.to_string(),
            snapshot,
            generation,
        );
        self.commits.insert(oid.clone(), commit);
        self.order.push(oid.clone());

        oid
    }

    pub fn load(&self, oid: &CommitId) -> Option<&Commit> {
        self.commits.get(oid)
    }

    pub fn contains(&self, oid: &CommitId) -> bool {
        self.commits.contains_key(oid)
    }

    pub fn load_slim(&self, oid: &CommitId) -> Option<SlimCommit<'_>> {
        self.commits.get(oid).map(Commit::as_slim)
    }

    /// Find a commit by exact ID given as text
    pub fn find_exact(&self, text: &str) -> Option<&Commit> {
        CommitId::try_parse(text)
            .ok()
            .and_then(|oid| self.commits.get(&oid))
    }

    /// Find the first commit, in creation order, whose ID starts with `prefix`
    ///
    /// Ambiguous prefixes are not reported; the oldest match wins.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Commit> {
        self.order
            .iter()
            .find(|oid| oid.matches_prefix(prefix))
            .and_then(|oid| self.commits.get(oid))
    }

    /// All commits in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Commit> {
        self.order.iter().filter_map(|oid| self.commits.get(oid))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every commit not in `reachable`, returning how many were removed
    pub fn retain_reachable(&mut self, reachable: &HashSet<CommitId>) -> usize {
        let before = self.order.len();

        self.commits.retain(|oid, _| reachable.contains(oid));
        self.order.retain(|oid| reachable.contains(oid));

        before - self.order.len()
    }

    /// Remove every commit
    pub fn clear(&mut self) {
        self.commits.clear();
        self.order.clear();
    }
}
