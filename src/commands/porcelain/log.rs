use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;

impl Repository {
    /// First-parent history from HEAD, newest first
    pub fn log(&self) -> RevList<'_> {
        let head = self.refs.read_head();
        let start = head.and_then(|oid| self.database.load(&oid)).map(Commit::id);

        RevList::new(&self.database, start)
    }

    pub fn get_log(&self) -> Vec<&Commit> {
        self.log().into_iter().collect()
    }
}
