use bitsim::areas::repository::Repository;
use bitsim::error::RepositoryError;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

mod common;
use common::{commit_file, head, repository, snapshot_of, tip};

/// `feature` has two commits of its own, `main` one, both on top of the root
#[fixture]
fn diverged(mut repository: Repository) -> Repository {
    repository.create_branch("feature").unwrap();
    commit_file(&mut repository, "f1.txt", "1");
    commit_file(&mut repository, "f2.txt", "2");
    repository.checkout("main").unwrap();
    commit_file(&mut repository, "m.txt", "m");
    repository.checkout("feature").unwrap();
    repository
}

#[rstest]
fn replays_branch_commits_on_the_target(mut diverged: Repository) {
    let main_tip = tip(&diverged, "main");
    let originals = diverged
        .get_log()
        .into_iter()
        .take(2)
        .map(|commit| (commit.id().clone(), commit.message().to_string()))
        .collect::<Vec<_>>();

    let outcome = diverged.rebase("main").unwrap();

    assert!(!outcome.fast_forward);
    assert_eq!(outcome.replayed.len(), 2);
    assert_eq!(outcome.conflicts().count(), 0);
    assert_eq!(outcome.head, tip(&diverged, "feature"));
    assert_eq!(tip(&diverged, "main"), main_tip);

    let log = diverged.get_log();
    let messages = log.iter().map(|commit| commit.message()).collect::<Vec<_>>();
    assert_eq!(
        messages[..2].to_vec(),
        vec![originals[0].1.as_str(), originals[1].1.as_str()]
    );
    assert_eq!(log[2].id(), &main_tip);
    assert!(log[..2].iter().all(|commit| commit.parents().len() == 1));

    let snapshot = snapshot_of(&diverged, &outcome.head);
    for path in ["f1.txt", "f2.txt", "m.txt", "README.md"] {
        assert!(snapshot.contains_key(path), "{path} missing after rebase");
    }
    assert_eq!(diverged.workspace().files(), snapshot);

    // originals stay in the store until garbage collected
    for (oid, _) in &originals {
        assert!(diverged.database().contains(oid));
    }
}

#[rstest]
fn behind_branch_is_fast_forwarded(mut repository: Repository) {
    repository.create_branch("feature").unwrap();
    repository.checkout("main").unwrap();
    let main_tip = commit_file(&mut repository, "a.txt", "1");
    repository.checkout("feature").unwrap();
    let commits = repository.database().len();

    let outcome = repository.rebase("main").unwrap();

    assert!(outcome.fast_forward);
    assert!(outcome.replayed.is_empty());
    assert_eq!(repository.database().len(), commits);
    assert_eq!(tip(&repository, "feature"), main_tip);
    assert_eq!(repository.workspace().read_file("a.txt"), Some("1"));
}

#[rstest]
fn ahead_branch_is_up_to_date(mut repository: Repository) {
    repository.create_branch("feature").unwrap();
    commit_file(&mut repository, "a.txt", "1");

    assert_eq!(
        repository.rebase("main"),
        Err(RepositoryError::AlreadyUpToDate("main".into()))
    );
}

#[rstest]
fn same_tip_is_up_to_date(mut repository: Repository) {
    repository.create_branch("feature").unwrap();

    assert_eq!(
        repository.rebase("main"),
        Err(RepositoryError::AlreadyUpToDate("main".into()))
    );
}

#[rstest]
fn conflicting_replay_keeps_the_new_base_and_continues(mut repository: Repository) {
    repository.create_branch("feature").unwrap();
    commit_file(&mut repository, "a.txt", "feature");
    commit_file(&mut repository, "b.txt", "feature");
    repository.checkout("main").unwrap();
    commit_file(&mut repository, "a.txt", "main");
    repository.checkout("feature").unwrap();

    let outcome = repository.rebase("main").unwrap();

    assert_eq!(outcome.conflicts().collect::<Vec<_>>(), vec!["a.txt"]);
    assert_eq!(outcome.replayed.len(), 2);
    assert_eq!(repository.workspace().read_file("a.txt"), Some("main"));
    assert_eq!(repository.workspace().read_file("b.txt"), Some("feature"));
    assert_eq!(repository.conflict(), None);
}

#[rstest]
fn unknown_branch_is_rejected(mut diverged: Repository) {
    assert_eq!(
        diverged.rebase("ghost"),
        Err(RepositoryError::BranchNotFound("ghost".into()))
    );
}

#[rstest]
fn detached_head_cannot_rebase(mut diverged: Repository) {
    let current = head(&diverged);
    diverged.checkout(&current.to_string()).unwrap();

    assert_eq!(
        diverged.rebase("main"),
        Err(RepositoryError::DetachedHeadForbidden("rebase"))
    );
}
