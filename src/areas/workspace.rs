//! Working tree
//!
//! The mutable file map the user edits. Checkout and hard reset replace it
//! wholesale with a commit's snapshot; edits and merges change it path by path.

use crate::artifacts::objects::Snapshot;

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    files: Snapshot,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &Snapshot {
        &self.files
    }

    pub fn read_file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn write_file(&mut self, path: &str, content: &str) {
        self.files.insert(path.to_string(), content.to_string());
    }

    pub fn remove_file(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }

    /// Replace the whole tree with a snapshot
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.files = snapshot;
    }

    pub fn list_files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}
