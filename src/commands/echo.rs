//! # Echo Command
//!
//! Prints its arguments once per repository after macro expansion. Mostly
//! a testing aid for the `{{.Name}}`-style macros the exec and proxy
//! commands accept.

use crate::repository::Repository;

/// The `echo` operation.
#[derive(Debug, Clone)]
pub struct EchoOp {
    args: Vec<String>,
}

impl EchoOp {
    pub fn new(args: Vec<String>) -> EchoOp {
        EchoOp { args }
    }

    pub fn execute(&self, mut repository: Repository) -> Option<Repository> {
        let line = repository.expand_macros(&self.args).join(" ");
        repository.put_note("echo.line", line);
        Some(repository)
    }

    pub fn line(&self, repository: &Repository) -> String {
        repository.note("echo.line").to_string()
    }
}
