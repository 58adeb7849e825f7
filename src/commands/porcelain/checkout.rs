use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::RefLookup;
use crate::error::Result;
use tracing::info;

/// Branch names win over commit IDs
const CHECKOUT_LOOKUP: [RefLookup; 2] = [RefLookup::Branch, RefLookup::ExactId];

impl Repository {
    /// Move HEAD to a branch (attached) or a commit (detached)
    ///
    /// The working tree is replaced with the target's snapshot; staging and
    /// any interrupted merge are dropped.
    pub fn checkout(&mut self, target: &str) -> Result<Head> {
        let resolved = self.revisions().resolve(target, &CHECKOUT_LOOKUP)?;
        let snapshot = self.load_commit(&resolved.oid)?.snapshot().clone();

        let head = match resolved.branch {
            Some(branch_name) => Head::Attached(branch_name),
            None => Head::Detached(resolved.oid),
        };

        self.refs.set_head(head.clone());
        self.check_out_snapshot(snapshot);
        self.conflict = None;
        self.pending_merge = None;

        info!(target, detached = head.is_detached(), "checked out");

        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use crate::areas::refs::Head;
    use crate::areas::repository::Repository;
    use crate::artifacts::branch::branch_name::BranchName;
    use crate::config::RepositoryConfig;
    use crate::error::RepositoryError;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> Repository {
        let mut repository = Repository::initialized(RepositoryConfig::default()).unwrap();
        repository.create_branch("feature").unwrap();
        repository.edit_file("a.txt", "feature");
        repository.stage_file(".").unwrap();
        repository.commit("feature work").unwrap();
        repository
    }

    #[rstest]
    fn branch_checkout_attaches_and_restores_files(mut repository: Repository) {
        let head = repository.checkout("main").unwrap();

        assert_eq!(head, Head::Attached(BranchName::try_parse("main").unwrap()));
        assert!(!repository.workspace().contains("a.txt"));
    }

    #[rstest]
    fn id_checkout_detaches_even_at_a_branch_tip(mut repository: Repository) {
        let tip = repository.refs().read_head().unwrap();

        let head = repository.checkout(tip.as_ref()).unwrap();

        assert_eq!(head, Head::Detached(tip));
        assert_eq!(repository.workspace().read_file("a.txt"), Some("feature"));
    }

    #[rstest]
    fn unknown_target_changes_nothing(mut repository: Repository) {
        repository.edit_file("scratch", "keep me");
        let before = repository.snapshot();

        assert_eq!(
            repository.checkout("nowhere"),
            Err(RepositoryError::TargetNotFound("nowhere".into()))
        );
        assert_eq!(repository.snapshot(), before);
    }

    #[rstest]
    fn short_ids_are_not_checkout_targets(mut repository: Repository) {
        let tip = repository.refs().read_head().unwrap();

        assert!(repository.checkout(&tip.to_short_oid()).is_err());
    }
}
