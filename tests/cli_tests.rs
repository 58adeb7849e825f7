use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn workdir() -> TempDir {
    TempDir::new().unwrap()
}

fn bitsim() -> Command {
    let mut command = Command::cargo_bin("bitsim").unwrap();
    command
        .env_remove("RUST_LOG")
        .env_remove("BITSIM_LOG")
        .env_remove("BITSIM_DEFAULT_BRANCH")
        .env_remove("BITSIM_INITIAL_MESSAGE");
    command
}

fn script(workdir: &TempDir, lines: &[&str]) -> std::path::PathBuf {
    let script = workdir.child("session.txt");
    script.write_str(&lines.join("\n")).unwrap();
    script.path().to_path_buf()
}

#[rstest]
fn runs_a_commit_script(workdir: TempDir) {
    let script = script(
        &workdir,
        &["edit a.txt hello", "git add .", "git commit -m \"first\"", "git log"],
    );

    bitsim()
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("$ git add ."))
        .stdout(predicate::str::is_match(r"\[main [0-9a-f]{7}\] first").unwrap())
        .stdout(predicate::str::contains("(HEAD -> main)"))
        .stdout(predicate::str::contains("    Initial commit"));
}

#[rstest]
fn conflict_and_resolution(workdir: TempDir) {
    let script = script(
        &workdir,
        &[
            "git checkout -b feature",
            "edit a.txt feature",
            "git add a.txt",
            "git commit -m 'feature change'",
            "git checkout main",
            "edit a.txt main",
            "git add a.txt",
            "git commit -m 'main change'",
            "git merge feature",
            "git status",
            "resolve merged",
            "git commit",
        ],
    );

    bitsim()
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CONFLICT (add/add): Merge conflict in a.txt",
        ))
        .stdout(predicate::str::contains("You have unmerged paths."))
        .stdout(predicate::str::contains("Resolved 'a.txt'."))
        .stdout(predicate::str::contains("Merge branch 'feature' into main"));
}

#[rstest]
fn rejected_commands_fail_the_run(workdir: TempDir) {
    let script = script(&workdir, &["git merge ghost", "git push", "git status"]);

    bitsim()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stdout(predicate::str::contains("fatal: branch 'ghost' not found"))
        .stdout(predicate::str::contains("'push' is not a git command"))
        .stdout(predicate::str::contains("On branch main"))
        .stderr(predicate::str::contains("2 command(s) failed"));
}

#[rstest]
fn json_flag_prints_the_final_state(workdir: TempDir) {
    let script = script(&workdir, &["git checkout -b feature", "edit notes.txt draft"]);

    bitsim()
        .arg("--json")
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"workingTree\""))
        .stdout(predicate::str::contains("\"notes.txt\": \"draft\""))
        .stdout(predicate::str::contains("\"feature\""));
}

#[rstest]
fn config_file_sets_the_default_branch(workdir: TempDir) {
    let config = workdir.child("bitsim.toml");
    config
        .write_str("default_branch = \"trunk\"\ninitial_message = \"Genesis\"\n")
        .unwrap();
    let script = script(&workdir, &["git branch", "git log"]);

    bitsim()
        .arg("--config")
        .arg(config.path())
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("* trunk"))
        .stdout(predicate::str::contains("    Genesis"));
}

#[rstest]
fn invalid_config_is_reported(workdir: TempDir) {
    let config = workdir.child("bitsim.toml");
    config.write_str("default_branch = \"bad name\"\n").unwrap();
    let script = script(&workdir, &["git status"]);

    bitsim()
        .arg("--config")
        .arg(config.path())
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad name"));
}

#[test]
fn interactive_shell_reads_stdin() {
    bitsim()
        .arg("shell")
        .write_stdin("git branch feature\ngit branch\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(main) $"))
        .stdout(predicate::str::contains("Switched to a new branch 'feature'"))
        .stdout(predicate::str::contains("* feature"));
}

#[test]
fn missing_script_is_an_error() {
    bitsim()
        .args(["run", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read script"));
}
