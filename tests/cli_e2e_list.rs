//! End-to-end tests for `list` and the git pass-through commands. These
//! need a real git binary and skip when none is installed.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{git_available, init_real_repo, RepoTree};

fn githerd() -> Command {
    Command::cargo_bin("githerd").unwrap()
}

#[test]
fn test_list_shows_branch_and_last_commit() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }

    let tree = RepoTree::new();
    init_real_repo(tree.path(), "proj");

    githerd()
        .arg("--root")
        .arg(tree.path())
        .arg("list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Name")
                .and(predicate::str::contains("Branch"))
                .and(predicate::str::contains("Last commit"))
                .and(predicate::str::contains("proj"))
                .and(predicate::str::contains("first commit")),
        );
}

#[test]
fn test_list_without_commits_shows_placeholders() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }

    let tree = RepoTree::new();
    std::fs::create_dir_all(tree.path().join("fresh")).unwrap();
    let status = std::process::Command::new("git")
        .args(["init", "--quiet"])
        .current_dir(tree.path().join("fresh"))
        .status()
        .unwrap();
    assert!(status.success());

    githerd()
        .arg("--root")
        .arg(tree.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("fresh").and(predicate::str::contains("-")));
}

#[test]
fn test_status_proxy_reports_untracked_files() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }

    let tree = RepoTree::new().file("proj/notes.txt", "pending\n");
    init_real_repo(tree.path(), "proj");

    githerd()
        .arg("--root")
        .arg(tree.path())
        .args(["status", "--short"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Status")
                .and(predicate::str::contains("proj"))
                .and(predicate::str::contains("notes.txt")),
        );
}

#[test]
fn test_proxy_failure_row_shows_the_error_text() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }

    let tree = RepoTree::new();
    init_real_repo(tree.path(), "proj");

    // An unknown revision makes git log fail; the row carries its stderr.
    githerd()
        .arg("--root")
        .arg(tree.path())
        .args(["log", "no-such-revision"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proj").and(predicate::str::contains("no-such-revision")));
}

#[test]
fn test_current_branch_filter_against_real_repository() {
    if !git_available() {
        eprintln!("skipping: git not installed");
        return;
    }

    let tree = RepoTree::new();
    init_real_repo(tree.path(), "proj");

    githerd()
        .arg("--root")
        .arg(tree.path())
        .args(["--current", "no-such-branch", "echo", "{{.Name}}"])
        .assert()
        .success()
        .stdout("");
}
