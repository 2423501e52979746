//! # Repository Descriptor
//!
//! This module defines [`Repository`], the record describing one discovered
//! working tree: its display name relative to the search root, the directory
//! external commands run in, and the resolved location of the git metadata.
//!
//! A descriptor is constructed once by discovery and then flows through the
//! pipeline as an owned value. Branch and status lookups shell out to `git`
//! lazily and memoize the answer; ref and remote lookups read the metadata
//! directory directly so filters work without spawning processes. Commands
//! record their per-repository results in a string-keyed note bag, keyed by
//! operation name, which the report renderer reads back afterwards.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use ini::Ini;

/// Label rendered for a repository found at the search root itself.
const ROOT_LABEL: &str = "(root)";

/// One discovered working tree.
#[derive(Debug, Clone)]
pub struct Repository {
    sequence: usize,
    name: String,
    work_dir: PathBuf,
    git_dir: PathBuf,

    branch: Option<String>,
    status: Option<String>,

    notes: HashMap<String, String>,
}

impl Repository {
    /// Build a descriptor from paths discovery has already resolved.
    ///
    /// `work_dir` is where commands execute; `git_dir` is the metadata root,
    /// which differs from `work_dir/.git` when a redirect pointer was
    /// followed.
    pub fn new(
        sequence: usize,
        name: impl Into<String>,
        work_dir: impl Into<PathBuf>,
        git_dir: impl Into<PathBuf>,
    ) -> Repository {
        Repository {
            sequence,
            name: name.into(),
            work_dir: work_dir.into(),
            git_dir: git_dir.into(),
            branch: None,
            status: None,
            notes: HashMap::new(),
        }
    }

    /// Position in discovery order, used to restore output order.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Path relative to the search root; empty for the root itself.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as rendered in reports.
    pub fn show_name(&self) -> &str {
        if self.name.is_empty() {
            ROOT_LABEL
        } else {
            &self.name
        }
    }

    /// Directory external commands run in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Resolved git metadata root.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Record a result under an operation-scoped key.
    pub fn put_note(&mut self, key: &str, value: impl Into<String>) {
        self.notes.insert(key.to_string(), value.into());
    }

    /// Read back a recorded result; missing keys read as empty.
    pub fn note(&self, key: &str) -> &str {
        self.notes.get(key).map_or("", String::as_str)
    }

    /// Run a program in the work directory, capturing its output.
    ///
    /// Returns whether the program exited successfully along with its
    /// combined stdout and stderr. A program that could not be started at
    /// all reports failure with the launch error as its output.
    pub fn run_at<I, S>(&self, program: &str, args: I) -> (bool, String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        debug!(
            "[{}] running {} with arguments {:?}",
            self.show_name(),
            program,
            args
        );

        let output = Command::new(program)
            .args(&args)
            .current_dir(&self.work_dir)
            .output();

        match output {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                if !output.status.success() {
                    debug!(
                        "[{}] {} exited with {} \"{}\"",
                        self.show_name(),
                        program,
                        output.status,
                        combined.trim_end()
                    );
                }
                (output.status.success(), combined)
            }
            Err(err) => (false, format!("failed to run {program}: {err}")),
        }
    }

    /// Run a program in the work directory attached to the terminal.
    ///
    /// Stdin, stdout and stderr are inherited from this process, so nothing
    /// is captured; on failure the returned string describes what went
    /// wrong.
    pub fn run_at_interactive<I, S>(&self, program: &str, args: I) -> (bool, String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        debug!(
            "[{}] running {} interactively with arguments {:?}",
            self.show_name(),
            program,
            args
        );

        let status = Command::new(program)
            .args(&args)
            .current_dir(&self.work_dir)
            .status();

        match status {
            Ok(status) if status.success() => (true, String::new()),
            Ok(status) => (false, format!("{program} exited with {status}")),
            Err(err) => (false, format!("failed to run {program}: {err}")),
        }
    }

    /// Run git in the work directory, capturing combined output.
    pub fn run_git<I, S>(&self, args: I) -> (bool, String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.run_at("git", args)
    }

    /// Run git attached to the terminal.
    pub fn run_git_interactive<I, S>(&self, args: I) -> (bool, String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.run_at_interactive("git", args)
    }

    /// Current branch name, resolved via git on first use.
    pub fn current_branch(&mut self) -> String {
        if self.branch.is_none() {
            let (ok, output) = self.run_git(["rev-parse", "--abbrev-ref", "HEAD"]);
            self.branch = Some(if ok {
                output.trim_end().to_string()
            } else {
                String::new()
            });
        }
        self.branch.clone().unwrap_or_default()
    }

    /// Summary of the working tree state: which of staged, unstaged and
    /// untracked changes are present. Empty for a clean tree.
    pub fn status_judgement(&mut self) -> String {
        if self.status.is_none() {
            let (_, output) = self.run_git(["status", "--porcelain"]);
            self.status = Some(output);
        }
        judge_status(self.status.as_deref().unwrap_or_default())
    }

    /// Branch names, read from the loose refs in the metadata root.
    pub fn branches(&self) -> Vec<String> {
        self.read_refs("refs/heads")
    }

    /// Tag names, read from the loose refs in the metadata root.
    pub fn tags(&self) -> Vec<String> {
        self.read_refs("refs/tags")
    }

    fn read_refs(&self, subdir: &str) -> Vec<String> {
        let dir = self.git_dir.join(subdir);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("[{}] cannot list {}: {}", self.show_name(), subdir, err);
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        for entry in entries.flatten() {
            // Refs in subdirectories (namespaced branches) are not listed.
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Remote names mapped to their urls, parsed from the metadata
    /// configuration file. Unreadable or absent configuration reads as no
    /// remotes.
    pub fn remotes(&self) -> HashMap<String, String> {
        let mut remotes = HashMap::new();

        let path = self.git_dir.join("config");
        let config = match Ini::load_from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                debug!(
                    "[{}] cannot read {}: {}",
                    self.show_name(),
                    path.display(),
                    err
                );
                return remotes;
            }
        };

        for (section, properties) in config.iter() {
            let Some(section) = section else { continue };
            if let Some(name) = quoted_section(section, "remote") {
                if let Some(url) = properties.get("url") {
                    remotes.insert(name.to_string(), url.to_string());
                }
            }
        }
        remotes
    }

    /// Replace `{{.Name}}`, `{{.Path}}` and `{{.CurrentBranch}}` in each
    /// argument. The branch is only resolved when an argument asks for it.
    pub fn expand_macros(&mut self, args: &[String]) -> Vec<String> {
        let branch = if args.iter().any(|a| a.contains("{{.CurrentBranch}}")) {
            self.current_branch()
        } else {
            String::new()
        };
        let path = self.work_dir.display().to_string();

        args.iter()
            .map(|arg| {
                arg.replace("{{.Name}}", &self.name)
                    .replace("{{.Path}}", &path)
                    .replace("{{.CurrentBranch}}", &branch)
            })
            .collect()
    }
}

/// Extract `name` from an INI section heading written as `kind "name"`, the
/// convention git configuration uses for remotes.
pub(crate) fn quoted_section<'a>(section: &'a str, kind: &str) -> Option<&'a str> {
    section
        .strip_prefix(kind)?
        .strip_prefix(" \"")?
        .strip_suffix('"')
}

/// Reduce `git status --porcelain` output to the kinds of change present.
fn judge_status(porcelain: &str) -> String {
    let mut staged = false;
    let mut unstaged = false;
    let mut untracked = false;

    for line in porcelain.lines() {
        let bytes = line.as_bytes();
        if bytes.len() < 2 {
            continue;
        }
        if bytes[0] == b'?' || bytes[1] == b'?' {
            untracked = true;
        } else if bytes[0] != b' ' {
            staged = true;
        } else if bytes[1] != b' ' {
            unstaged = true;
        }
    }

    let mut judgements = Vec::new();
    if staged {
        judgements.push("Staged");
    }
    if unstaged {
        judgements.push("Unstaged");
    }
    if untracked {
        judgements.push("Untracked");
    }
    judgements.join(", ")
}
