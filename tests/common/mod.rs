#![allow(dead_code)]

use bitsim::areas::repository::Repository;
use bitsim::artifacts::objects::Snapshot;
use bitsim::artifacts::objects::object_id::CommitId;
use bitsim::config::RepositoryConfig;
use rstest::fixture;

/// Initialized repository with the default root commit on `main`
#[fixture]
pub fn repository() -> Repository {
    Repository::initialized(RepositoryConfig::default()).expect("default config is valid")
}

/// Edit, stage and commit a single file
pub fn commit_file(repository: &mut Repository, path: &str, content: &str) -> CommitId {
    repository.edit_file(path, content);
    repository.stage_file(path).expect("path was just written");
    repository
        .commit(&format!("write {path}"))
        .expect("staged change commits")
}

pub fn tip(repository: &Repository, branch: &str) -> CommitId {
    repository
        .refs()
        .find_branch(branch)
        .map(|(_, oid)| oid.clone())
        .unwrap_or_else(|| panic!("branch {branch} exists"))
}

pub fn head(repository: &Repository) -> CommitId {
    repository.refs().read_head().expect("HEAD is born")
}

pub fn snapshot_of<'r>(repository: &'r Repository, oid: &CommitId) -> &'r Snapshot {
    repository
        .database()
        .load(oid)
        .expect("commit exists")
        .snapshot()
}

pub fn files(pairs: &[(&str, &str)]) -> Snapshot {
    pairs
        .iter()
        .map(|(path, content)| (path.to_string(), content.to_string()))
        .collect()
}

/// `main` and `feature` both changed `path` differently since the root
pub fn conflicting_branches(repository: &mut Repository, path: &str) {
    repository.create_branch("feature").expect("new branch");
    commit_file(repository, path, "feature version");
    repository.checkout("main").expect("main exists");
    commit_file(repository, path, "main version");
}
