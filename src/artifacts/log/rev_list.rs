//! First-parent history
//!
//! Follows only the first parent of each commit from a starting point back to
//! the root. Second parents of merges are not visited, which gives the linear
//! "mainline" view that `git log` prints here.

use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::CommitId;
use derive_new::new;

/// Restartable first-parent log
///
/// Cheap to copy; every call to [`RevList::iter`] starts over from the same
/// commit.
#[derive(Debug, Clone, Copy, new)]
pub struct RevList<'r> {
    database: &'r Database,
    start_oid: Option<&'r CommitId>,
}

impl<'r> RevList<'r> {
    pub fn iter(&self) -> RevListIter<'r> {
        RevListIter {
            database: self.database,
            current_commit_oid: self.start_oid,
        }
    }
}

impl<'r> IntoIterator for RevList<'r> {
    type Item = &'r Commit;
    type IntoIter = RevListIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct RevListIter<'r> {
    database: &'r Database,
    current_commit_oid: Option<&'r CommitId>,
}

impl<'r> Iterator for RevListIter<'r> {
    type Item = &'r Commit;

    fn next(&mut self) -> Option<Self::Item> {
        let commit = self.database.load(self.current_commit_oid?);

        // Move to the first parent for the next iteration
        self.current_commit_oid = commit.and_then(Commit::parent);

        commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::Snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn follows_first_parents_only() {
        let mut database = Database::new();
        let root = database.create_commit(vec![], "root", Snapshot::new(), "main");
        let main = database.create_commit(vec![root.clone()], "main", Snapshot::new(), "main");
        let side = database.create_commit(vec![root.clone()], "side", Snapshot::new(), "side");
        let merge = database.create_commit(vec![main, side], "merge", Snapshot::new(), "main");

        let rev_list = RevList::new(&database, Some(&merge));
        let messages = rev_list.iter().map(Commit::message).collect::<Vec<_>>();

        assert_eq!(messages, vec!["merge", "main", "root"]);
        // restartable
        assert_eq!(rev_list.into_iter().count(), 3);
    }

    #[test]
    fn empty_without_start() {
        let database = Database::new();
        assert_eq!(RevList::new(&database, None).iter().count(), 0);
    }
}
