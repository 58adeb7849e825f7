use bitsim::areas::refs::Head;
use bitsim::areas::repository::Repository;
use bitsim::artifacts::branch::branch_name::BranchName;
use bitsim::error::RepositoryError;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::{commit_file, head, repository, tip};

fn branch(name: &str) -> BranchName {
    BranchName::try_parse(name).unwrap()
}

#[rstest]
fn new_branch_starts_at_head_and_becomes_current(mut repository: Repository) {
    let root = head(&repository);

    let created = repository.create_branch("feature").unwrap();

    assert_eq!(created, branch("feature"));
    assert_eq!(tip(&repository, "feature"), root);
    assert_eq!(repository.refs().head(), &Head::Attached(branch("feature")));

    let listing = repository
        .branches()
        .into_iter()
        .map(|entry| (entry.name.to_string(), entry.is_current))
        .collect::<Vec<_>>();
    assert_eq!(
        listing,
        vec![("feature".to_string(), true), ("main".to_string(), false)]
    );
}

#[rstest]
fn creating_a_branch_keeps_uncommitted_work(mut repository: Repository) {
    repository.edit_file("a.txt", "draft");
    repository.stage_file("a.txt").unwrap();

    repository.create_branch("feature").unwrap();

    assert_eq!(repository.workspace().read_file("a.txt"), Some("draft"));
    assert!(repository.index().contains("a.txt"));
}

#[rstest]
#[case::existing("main", RepositoryError::BranchAlreadyExists("main".into()))]
#[case::head("HEAD", RepositoryError::InvalidBranchName("HEAD".into()))]
#[case::spaces("my branch", RepositoryError::InvalidBranchName("my branch".into()))]
#[case::double_dot("a..b", RepositoryError::InvalidBranchName("a..b".into()))]
fn bad_branch_names(mut repository: Repository, #[case] name: &str, #[case] expected: RepositoryError) {
    assert_eq!(repository.create_branch(name), Err(expected));
}

#[rstest]
fn checkout_branch_replaces_the_working_tree(mut repository: Repository) {
    repository.create_branch("feature").unwrap();
    commit_file(&mut repository, "a.txt", "feature");
    repository.edit_file("scratch.txt", "lost on checkout");

    let new_head = repository.checkout("main").unwrap();

    assert_eq!(new_head, Head::Attached(branch("main")));
    assert!(!repository.workspace().contains("a.txt"));
    assert!(!repository.workspace().contains("scratch.txt"));
    assert!(repository.index().is_empty());
}

#[rstest]
fn checkout_commit_detaches(mut repository: Repository) {
    let root = head(&repository);
    let first = commit_file(&mut repository, "a.txt", "1");

    let new_head = repository.checkout(&root.to_string()).unwrap();
    assert_eq!(new_head, Head::Detached(root.clone()));

    let detached = commit_file(&mut repository, "b.txt", "2");
    assert_eq!(head(&repository), detached);
    assert_eq!(tip(&repository, "main"), first);
}

#[rstest]
#[case::parent("main^")]
#[case::ancestor("main~1")]
#[case::head_parent("HEAD^")]
#[case::at_alias("@~1")]
fn checkout_relative_revisions_detach(mut repository: Repository, #[case] target: &str) {
    let root = head(&repository);
    commit_file(&mut repository, "a.txt", "1");

    assert_eq!(repository.checkout(target), Ok(Head::Detached(root)));
}

#[rstest]
fn checkout_prefers_branches_over_ids(mut repository: Repository) {
    let first = commit_file(&mut repository, "a.txt", "1");
    repository.create_branch("feature").unwrap();
    commit_file(&mut repository, "b.txt", "2");

    assert_eq!(repository.checkout("main"), Ok(Head::Attached(branch("main"))));
    assert_eq!(head(&repository), first);
}

#[rstest]
#[case::unknown("nowhere")]
#[case::past_root("main~5")]
#[case::short_id_is_not_enough("abc1234")]
fn checkout_unknown_target(mut repository: Repository, #[case] target: &str) {
    assert_eq!(
        repository.checkout(target),
        Err(RepositoryError::TargetNotFound(target.into()))
    );
}

#[rstest]
fn branch_from_detached_head_reattaches(mut repository: Repository) {
    let root = head(&repository);
    commit_file(&mut repository, "a.txt", "1");
    repository.checkout(&root.to_string()).unwrap();

    repository.create_branch("hotfix").unwrap();
    let fix = commit_file(&mut repository, "fix.txt", "patched");

    assert_eq!(tip(&repository, "hotfix"), fix);
    assert_eq!(repository.database().load(&fix).unwrap().parents(), &[root]);
}
