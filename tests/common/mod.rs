//! Shared fixtures for the end-to-end tests.
//!
//! Repositories are laid down by hand as bare `.git` metadata (HEAD,
//! config, loose refs), which is all discovery and the filters read. Tests
//! that need real git plumbing (`list`, the proxies) build their fixtures
//! with `git init` instead and skip when git is not installed.

use std::path::Path;
use std::process::Command;

use assert_fs::prelude::*;
use assert_fs::TempDir;

/// Builder for a tree of fake repositories below one temp directory.
pub struct RepoTree {
    temp: TempDir,
}

#[allow(dead_code)]
impl RepoTree {
    pub fn new() -> RepoTree {
        RepoTree {
            temp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// A repository with a literal `.git` metadata directory.
    pub fn repo(self, name: &str) -> Self {
        self.repo_with(name, &[], &[], &[])
    }

    /// A repository with the given branch refs, tag refs and remotes.
    pub fn repo_with(
        self,
        name: &str,
        branches: &[&str],
        tags: &[&str],
        remotes: &[(&str, &str)],
    ) -> Self {
        // An empty name puts the metadata at the tree root itself.
        let git = if name.is_empty() {
            ".git".to_string()
        } else {
            format!("{name}/.git")
        };
        self.temp
            .child(format!("{git}/HEAD"))
            .write_str("ref: refs/heads/master\n")
            .unwrap();
        self.temp.child(format!("{git}/refs/heads")).create_dir_all().unwrap();
        self.temp.child(format!("{git}/refs/tags")).create_dir_all().unwrap();

        for branch in branches {
            self.temp
                .child(format!("{git}/refs/heads/{branch}"))
                .write_str("0000000000000000000000000000000000000000\n")
                .unwrap();
        }
        for tag in tags {
            self.temp
                .child(format!("{git}/refs/tags/{tag}"))
                .write_str("0000000000000000000000000000000000000000\n")
                .unwrap();
        }

        let mut config = String::new();
        for (remote, url) in remotes {
            config.push_str(&format!("[remote \"{remote}\"]\n\turl = {url}\n"));
        }
        self.temp.child(format!("{git}/config")).write_str(&config).unwrap();

        self
    }

    /// A working tree whose `.git` is a redirect pointer file to
    /// `target`, given relative to the working tree.
    pub fn linked_repo(self, name: &str, target: &str) -> Self {
        self.temp
            .child(format!("{name}/.git"))
            .write_str(&format!("gitdir: {target}\n"))
            .unwrap();
        self
    }

    /// A bare metadata directory somewhere else on disk, for redirect
    /// targets.
    pub fn metadata_store(self, path: &str) -> Self {
        self.temp
            .child(format!("{path}/HEAD"))
            .write_str("ref: refs/heads/master\n")
            .unwrap();
        self.temp.child(format!("{path}/refs/heads")).create_dir_all().unwrap();
        self
    }

    /// Write a `.githerd` configuration file at the tree root.
    pub fn config_file(self, content: &str) -> Self {
        self.temp.child(".githerd").write_str(content).unwrap();
        self
    }

    /// An arbitrary file, for negative discovery cases.
    pub fn file(self, path: &str, content: &str) -> Self {
        self.temp.child(path).write_str(content).unwrap();
        self
    }
}

/// Whether a usable git binary is on the path. Suites that spawn git call
/// this first and return early when it is missing.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// `git init` plus one commit, so list and the proxies have something to
/// report. Panics on git failure; call `git_available` first.
#[allow(dead_code)]
pub fn init_real_repo(root: &Path, name: &str) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();

    for args in [
        vec!["init", "--quiet"],
        vec!["config", "user.email", "dev@example.com"],
        vec!["config", "user.name", "Dev"],
        vec!["commit", "--quiet", "--allow-empty", "-m", "first commit"],
    ] {
        let status = Command::new("git")
            .args(&args)
            .current_dir(&dir)
            .status()
            .expect("run git");
        assert!(status.success(), "git {args:?} failed in {}", dir.display());
    }
}
