//! # Path Command
//!
//! Prints each repository's working directory, optionally dropping
//! repositories whose path does not contain a search string. The one
//! built-in that uses the keep/drop seam: a non-matching repository is
//! absent from the report, not shown with an empty line.

use crate::repository::Repository;

/// The `path` operation.
#[derive(Debug, Clone)]
pub struct PathOp {
    needle: Option<String>,
}

impl PathOp {
    /// An optional first argument narrows the output to matching paths.
    pub fn new(args: Vec<String>) -> PathOp {
        PathOp {
            needle: args.into_iter().next().filter(|a| !a.is_empty()),
        }
    }

    pub fn execute(&self, repository: Repository) -> Option<Repository> {
        if let Some(needle) = &self.needle {
            let path = repository.work_dir().to_string_lossy();
            if !path.contains(needle.as_str()) {
                return None;
            }
        }
        Some(repository)
    }

    pub fn line(&self, repository: &Repository) -> String {
        repository.work_dir().display().to_string()
    }
}
