use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::CommitId;
use crate::error::Result;
use serde::Serialize;
use tracing::info;

/// One line of the branch listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchEntry {
    pub name: BranchName,
    pub oid: CommitId,
    pub is_current: bool,
}

impl Repository {
    /// Create a branch at HEAD and switch to it
    ///
    /// HEAD's commit is unchanged, so the working tree and staging stay as
    /// they are.
    pub fn create_branch(&mut self, name: &str) -> Result<BranchName> {
        let branch_name = BranchName::try_parse(name)?;
        let head = self.require_head()?;

        self.refs.create_branch(branch_name.clone(), head.clone())?;
        self.refs.set_head(Head::Attached(branch_name.clone()));

        info!(branch = %branch_name, oid = %head, "created branch");

        Ok(branch_name)
    }

    /// All branches ordered by name
    pub fn branches(&self) -> Vec<BranchEntry> {
        self.refs
            .list_branches()
            .map(|(name, oid)| BranchEntry {
                name: name.clone(),
                oid: oid.clone(),
                is_current: self.refs.is_current_branch(name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::areas::repository::Repository;
    use crate::config::RepositoryConfig;
    use crate::error::RepositoryError;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> Repository {
        Repository::initialized(RepositoryConfig::default()).unwrap()
    }

    #[rstest]
    fn new_branch_points_at_head_and_is_current(mut repository: Repository) {
        let head = repository.refs().read_head().unwrap();

        repository.create_branch("feature").unwrap();

        let branches = repository.branches();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].name.as_ref(), "feature");
        assert!(branches[0].is_current);
        assert_eq!(branches[0].oid, head);
        assert!(!branches[1].is_current);
    }

    #[rstest]
    fn duplicate_name_is_rejected(mut repository: Repository) {
        assert_eq!(
            repository.create_branch("main"),
            Err(RepositoryError::BranchAlreadyExists("main".into()))
        );
    }

    #[rstest]
    #[case("bad..name")]
    #[case("topic.lock")]
    #[case("trailing/")]
    #[case("with space")]
    fn invalid_names_are_rejected(mut repository: Repository, #[case] name: &str) {
        assert!(matches!(
            repository.create_branch(name),
            Err(RepositoryError::InvalidBranchName(_))
        ));
        assert_eq!(repository.branches().len(), 1);
    }

    #[test]
    fn unborn_repository_cannot_branch() {
        let mut repository = Repository::new(RepositoryConfig::default()).unwrap();

        assert_eq!(repository.create_branch("feature"), Err(RepositoryError::Unborn));
    }
}
