use bitsim::areas::repository::Repository;
use bitsim::commands::porcelain::merge::MergeOutcome;
use bitsim::commands::porcelain::reset::ResetMode;
use bitsim::error::RepositoryError;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::{commit_file, conflicting_branches, head, repository, tip};

#[rstest]
fn picked_commit_lands_on_head_with_its_message(mut repository: Repository) {
    repository.create_branch("feature").unwrap();
    commit_file(&mut repository, "one.txt", "1");
    let two = commit_file(&mut repository, "two.txt", "2");
    repository.checkout("main").unwrap();
    let main_before = tip(&repository, "main");

    let MergeOutcome::Committed(oid) = repository.cherry_pick(&two.to_string()).unwrap() else {
        panic!("cherry-pick should be clean");
    };

    let commit = repository.database().load(&oid).unwrap();
    assert_eq!(commit.parents(), &[main_before]);
    assert_eq!(commit.message(), "write two.txt");
    assert_ne!(oid, two);
    assert_eq!(tip(&repository, "main"), oid);
    assert_eq!(repository.workspace().read_file("two.txt"), Some("2"));
    assert!(!repository.workspace().contains("one.txt"));
}

#[rstest]
fn short_id_and_branch_name_resolve(mut repository: Repository) {
    repository.create_branch("feature").unwrap();
    let picked = commit_file(&mut repository, "one.txt", "1");
    repository.checkout("main").unwrap();

    let short = picked.to_short_oid();
    assert!(matches!(
        repository.cherry_pick(&short),
        Ok(MergeOutcome::Committed(_))
    ));

    repository.reset(ResetMode::Hard, "main~1").unwrap();
    assert!(matches!(
        repository.cherry_pick("feature"),
        Ok(MergeOutcome::Committed(_))
    ));
}

#[rstest]
fn conflict_stops_without_a_pending_merge(mut repository: Repository) {
    conflicting_branches(&mut repository, "a.txt");
    let main_before = head(&repository);
    let feature_tip = tip(&repository, "feature");

    let outcome = repository.cherry_pick(&feature_tip.to_string()).unwrap();

    let MergeOutcome::Conflicted(conflict) = outcome else {
        panic!("cherry-pick should conflict");
    };
    assert_eq!(conflict.path, "a.txt");
    assert_eq!(repository.pending_merge(), None);
    assert_eq!(head(&repository), main_before);

    repository.resolve_conflict("both").unwrap();
    let oid = repository.commit("picked by hand").unwrap();
    assert_eq!(repository.database().load(&oid).unwrap().parents(), &[main_before]);
}

#[rstest]
fn root_commit_cannot_be_picked(mut repository: Repository) {
    let root = head(&repository);
    commit_file(&mut repository, "a.txt", "1");

    assert_eq!(
        repository.cherry_pick(&root.to_string()),
        Err(RepositoryError::RootCommitCherryPick(root.to_short_oid()))
    );
}

#[rstest]
fn unknown_revision_is_rejected(mut repository: Repository) {
    assert_eq!(
        repository.cherry_pick("zzz"),
        Err(RepositoryError::TargetNotFound("zzz".into()))
    );
}
