//! Breadth-first ancestor walks
//!
//! [`Ancestors`] yields a commit followed by everything reachable through
//! any parent, each commit once, in breadth-first order. The walk is lazy and
//! consumed as it goes; build a new one to walk again.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::CommitId;
use std::collections::{HashSet, VecDeque};

pub struct Ancestors<'r> {
    database: &'r Database,
    queue: VecDeque<&'r CommitId>,
    visited: HashSet<&'r CommitId>,
}

impl<'r> Ancestors<'r> {
    /// Walk from a single commit (included in the output)
    pub fn new(database: &'r Database, start: &CommitId) -> Self {
        Self::from_roots(database, std::iter::once(start))
    }

    /// Walk from several commits at once
    ///
    /// Roots missing from the store are skipped.
    pub fn from_roots<'a>(
        database: &'r Database,
        roots: impl IntoIterator<Item = &'a CommitId>,
    ) -> Self {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();

        for root in roots {
            if let Some(commit) = database.load(root)
                && visited.insert(commit.id())
            {
                queue.push_back(commit.id());
            }
        }

        Self {
            database,
            queue,
            visited,
        }
    }
}

impl<'r> Iterator for Ancestors<'r> {
    type Item = &'r CommitId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;

        if let Some(commit) = self.database.load(current) {
            for parent in commit.parents() {
                if self.visited.insert(parent) {
                    self.queue.push_back(parent);
                }
            }
        }

        Some(current)
    }
}

/// Union of the ancestor sets of every root
pub fn reachable_from<'a>(
    database: &Database,
    roots: impl IntoIterator<Item = &'a CommitId>,
) -> HashSet<CommitId> {
    Ancestors::from_roots(database, roots).cloned().collect()
}

/// Whether `ancestor` is `commit` or one of its ancestors
pub fn is_ancestor(database: &Database, ancestor: &CommitId, commit: &CommitId) -> bool {
    Ancestors::new(database, commit).any(|oid| oid == ancestor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::Snapshot;
    use pretty_assertions::assert_eq;

    //     A
    //    / \
    //   B   C
    //    \ /
    //     D
    fn diamond() -> (Database, [CommitId; 4]) {
        let mut database = Database::new();
        let a = database.create_commit(vec![], "a", Snapshot::new(), "main");
        let b = database.create_commit(vec![a.clone()], "b", Snapshot::new(), "main");
        let c = database.create_commit(vec![a.clone()], "c", Snapshot::new(), "topic");
        let d = database.create_commit(vec![b.clone(), c.clone()], "d", Snapshot::new(), "main");
        (database, [a, b, c, d])
    }

    #[test]
    fn walks_breadth_first_without_repeats() {
        let (database, [a, b, c, d]) = diamond();

        let order = Ancestors::new(&database, &d).cloned().collect::<Vec<_>>();

        assert_eq!(order, vec![d, b, c, a]);
    }

    #[test]
    fn reachable_from_unions_roots() {
        let (database, [a, b, c, _]) = diamond();

        let reachable = reachable_from(&database, [&b, &c]);

        assert_eq!(reachable, HashSet::from([a, b, c]));
    }

    #[test]
    fn ancestry_checks() {
        let (database, [a, b, c, d]) = diamond();

        assert!(is_ancestor(&database, &a, &d));
        assert!(is_ancestor(&database, &d, &d));
        assert!(!is_ancestor(&database, &b, &c));
    }
}
