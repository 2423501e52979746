//! # Repository Discovery
//!
//! The walk that finds working trees below a root directory. Every visited
//! directory is checked for a `.git` anchor: either a metadata directory, or
//! a small redirect pointer file (`gitdir: <path>`) left by linked worktrees
//! and submodule checkouts. Redirects are resolved, submodule worktree
//! indirection is disambiguated, and a depth limit is applied before the
//! filter chain decides whether the repository takes part in the run.
//!
//! [`discover`] streams accepted descriptors through a bounded channel from
//! a dedicated producer thread, so traversal overlaps with whatever the
//! consumer does per repository. Anything unreadable or malformed along the
//! way is logged and skipped; discovery never fails a run.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::thread;

use flume::{Receiver, Sender};
use log::{debug, warn};
use regex::Regex;
use walkdir::WalkDir;

use crate::filter::FilterSet;
use crate::repository::Repository;

/// Channel capacity between the walk and the workers. Decouples traversal
/// speed from worker start-up; not needed for correctness.
const QUEUE_CAPACITY: usize = 100;

/// A `.git` entry larger than this cannot be a redirect pointer file.
const MAX_POINTER_SIZE: u64 = 4096;

/// Metadata configurations above this size are assumed to be something
/// other than a repository and the candidate is dropped.
const MAX_CONFIG_SIZE: u64 = 40960;

/// A resolved `.git` anchor: where commands run and where the metadata
/// actually lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub work_dir: PathBuf,
    pub git_dir: PathBuf,
}

/// Walk `root` and stream accepted repositories in discovery order.
///
/// The walk runs on its own thread and the returned channel closes when it
/// completes. Sequence numbers are assigned to accepted repositories only,
/// starting at zero. `depth` bounds how deeply nested a repository may be
/// (in path segments of its name); zero means unlimited.
pub fn discover(root: PathBuf, depth: usize, filters: FilterSet) -> Receiver<Repository> {
    let (tx, rx) = flume::bounded(QUEUE_CAPACITY);

    thread::spawn(move || walk(&root, depth, &filters, &tx));

    rx
}

/// The producer side of [`discover`]. Stops early if the receiver is gone.
fn walk(root: &Path, depth: usize, filters: &FilterSet, out: &Sender<Repository>) {
    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if depth > 0 {
        // A repository at the depth limit has its working directory at walk
        // depth `depth`, so this prunes exactly the subtrees that can no
        // longer contain an acceptable repository.
        walker = walker.max_depth(depth);
    }

    let mut sequence = 0;
    // The metadata itself is never searched for repositories.
    let entries = walker.into_iter().filter_entry(|e| e.file_name() != ".git");
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let candidate = entry.path().join(".git");
        if fs::symlink_metadata(&candidate).is_err() {
            continue;
        }
        let Some(anchor) = resolve_anchor(&candidate) else {
            continue;
        };

        let name = repository_name(root, &anchor.work_dir);
        if depth > 0 && name_depth(&name) > depth {
            debug!("skipping repository \"{name}\" (filtered by depth)");
            continue;
        }

        let mut repository = Repository::new(sequence, name, anchor.work_dir, anchor.git_dir);
        if !filters.accepts(&mut repository) {
            continue;
        }

        debug!("found repository \"{}\"", repository.show_name());
        sequence += 1;
        if out.send(repository).is_err() {
            // Receiver dropped; nobody wants the rest of the walk.
            return;
        }
    }
}

/// Resolve a `.git` entry to its working directory and metadata root.
///
/// A directory anchors in place. A file must be a redirect pointer whose
/// target exists; if the target's configuration records a worktree
/// back-reference, the submodule disambiguation of [`resolve_worktree`]
/// applies. `None` means the candidate is not a repository worth listing.
pub fn resolve_anchor(anchor: &Path) -> Option<Anchor> {
    let work_dir = anchor.parent()?.to_path_buf();

    let metadata = match fs::symlink_metadata(anchor) {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!("cannot stat {}: {err}", anchor.display());
            return None;
        }
    };

    let git_dir = if metadata.is_dir() {
        anchor.to_path_buf()
    } else {
        if metadata.len() >= MAX_POINTER_SIZE {
            warn!(
                "ignoring implausibly large .git file {} ({} bytes)",
                anchor.display(),
                metadata.len()
            );
            return None;
        }
        let target = read_redirect(anchor, &work_dir)?;
        if !target.exists() {
            debug!(
                "redirect in {} points at missing {}",
                anchor.display(),
                target.display()
            );
            return None;
        }
        target
    };

    if !resolve_worktree(&git_dir) {
        return None;
    }

    Some(Anchor { work_dir, git_dir })
}

/// Read a redirect pointer file and resolve its target against the
/// anchor's directory.
fn read_redirect(anchor: &Path, work_dir: &Path) -> Option<PathBuf> {
    let content = match fs::read_to_string(anchor) {
        Ok(content) => content,
        Err(err) => {
            warn!("cannot read {}: {err}", anchor.display());
            return None;
        }
    };

    let Some(target) = content.strip_prefix("gitdir: ") else {
        debug!("{} is not a redirect pointer", anchor.display());
        return None;
    };
    let target = Path::new(target.trim_end_matches(['\r', '\n']));

    if target.is_absolute() {
        Some(clean_path(target))
    } else {
        Some(clean_path(&work_dir.join(target)))
    }
}

/// Disambiguate submodule checkouts from stranger indirections.
///
/// A metadata root whose `config` records `worktree = <path>` belongs to a
/// submodule; the checkout is only listed when `<path>/.git` is a redirect
/// pointer file. A target that is missing, or a directory, means the
/// worktree reference points somewhere that is not this checkout, and the
/// candidate is dropped. Returns whether to keep the candidate.
fn resolve_worktree(git_dir: &Path) -> bool {
    let config = git_dir.join("config");
    let metadata = match fs::symlink_metadata(&config) {
        // No configuration, no indirection to resolve.
        Err(_) => return true,
        Ok(metadata) => metadata,
    };

    if metadata.len() > MAX_CONFIG_SIZE {
        warn!(
            "ignoring repository with huge configuration {} ({} bytes)",
            config.display(),
            metadata.len()
        );
        return false;
    }

    let content = match fs::read_to_string(&config) {
        Ok(content) => content,
        Err(err) => {
            warn!("cannot read {}: {err}", config.display());
            return false;
        }
    };

    let worktree = Regex::new("worktree = (.+)").expect("worktree pattern is valid");
    let Some(capture) = worktree.captures(&content) else {
        return true;
    };

    let target = clean_path(&git_dir.join(&capture[1]).join(".git"));
    match fs::symlink_metadata(&target) {
        Ok(metadata) => !metadata.is_dir(),
        Err(_) => false,
    }
}

/// The repository's name: its working directory relative to the search
/// root. The root itself has an empty name.
fn repository_name(root: &Path, work_dir: &Path) -> String {
    let relative = work_dir.strip_prefix(root).unwrap_or(work_dir);
    relative.to_string_lossy().replace('\\', "/")
}

/// Path-segment count of a name; the root counts as one segment.
fn name_depth(name: &str) -> usize {
    name.split('/').count()
}

/// Lexically remove `.` and `..` components so resolved redirect targets
/// compare equal across runs.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push(component.as_os_str());
                }
            }
            _ => cleaned.push(component.as_os_str()),
        }
    }
    cleaned
}
