//! # Exec Command
//!
//! Runs an arbitrary program in each repository's working directory after
//! macro expansion. Batch runs capture combined output into the report;
//! with `-i` the child inherits the terminal instead and the report only
//! records whether it succeeded.

use crate::error::{Error, Result};
use crate::output;
use crate::repository::Repository;

/// The `exec` operation.
#[derive(Debug, Clone)]
pub struct ExecOp {
    args: Vec<String>,
    interactive: bool,
}

impl ExecOp {
    /// The first argument is the program to run; the rest are passed
    /// through after macro expansion.
    pub fn new(args: Vec<String>, interactive: bool) -> Result<ExecOp> {
        if args.is_empty() {
            return Err(Error::MissingArgument {
                command: "exec".to_string(),
                expected: "a program to run".to_string(),
            });
        }
        Ok(ExecOp { args, interactive })
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    /// Run the program and record its output. Failures are recorded as the
    /// repository's output rather than dropping the row; the report is
    /// where the user looks for them.
    pub fn execute(&self, mut repository: Repository) -> Option<Repository> {
        let args = repository.expand_macros(&self.args);
        let Some((program, rest)) = args.split_first() else {
            return Some(repository);
        };

        let output = if self.interactive {
            let (ok, error) = repository.run_at_interactive(program, rest);
            if ok {
                "Ok".to_string()
            } else {
                error
            }
        } else {
            let (_, combined) = repository.run_at(program, rest);
            combined.trim().to_string()
        };

        repository.put_note("exec.output", output);
        Some(repository)
    }

    pub fn header(&self) -> Vec<String> {
        ["Repository", "Output"].map(String::from).to_vec()
    }

    pub fn rows(&self, repository: &Repository) -> Vec<Vec<String>> {
        output::format_row(repository.show_name(), repository.note("exec.output"))
    }
}
