//! Staging index
//!
//! The set of paths marked for the next commit. Content is not copied into
//! the index: a commit reads each staged path from the working tree at commit
//! time, and a staged path missing from the working tree records a deletion.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: BTreeSet<String>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str) {
        self.entries.insert(path.to_string());
    }

    pub fn add_all<'p>(&mut self, paths: impl IntoIterator<Item = &'p str>) {
        self.entries.extend(paths.into_iter().map(str::to_string));
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &BTreeSet<String> {
        &self.entries
    }
}
