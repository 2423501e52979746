//! # Git Proxy Commands
//!
//! Pass-throughs to `git <subcommand>` in each repository. A fixed set of
//! subcommands is registered by default and configuration files can add
//! more, optionally with their own usage text, help text and interactive
//! flag. Interactive proxies inherit the terminal; their rows only say
//! that the command ran.

use std::process::Command;

use crate::output;
use crate::repository::Repository;

/// One git pass-through operation, bound to its arguments.
#[derive(Debug, Clone)]
pub struct ProxyOp {
    name: String,
    args: Vec<String>,
    interactive: bool,
}

impl ProxyOp {
    /// `git` holds the subcommand tokens the proxy always passes; `extra`
    /// is whatever followed the command name on this run's command line.
    pub fn new(name: &str, git: &[String], extra: Vec<String>, interactive: bool) -> ProxyOp {
        let mut args = git.to_vec();
        args.extend(extra);
        ProxyOp {
            name: name.to_string(),
            args,
            interactive,
        }
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    fn note_key(&self) -> String {
        format!("proxy.{}", self.name)
    }

    /// Run git and record its output. Non-zero exits keep their rows so
    /// the failure text lands in the report next to the successes.
    pub fn execute(&self, mut repository: Repository) -> Option<Repository> {
        let args = repository.expand_macros(&self.args);

        let output = if self.interactive {
            let (ok, error) = repository.run_git_interactive(&args);
            if ok {
                "(interactive command ran)".to_string()
            } else {
                error
            }
        } else {
            let (_, combined) = repository.run_git(&args);
            combined.trim().to_string()
        };

        let key = self.note_key();
        repository.put_note(&key, output);
        Some(repository)
    }

    pub fn header(&self) -> Vec<String> {
        vec![title_case(&self.name), "Output".to_string()]
    }

    pub fn rows(&self, repository: &Repository) -> Vec<Vec<String>> {
        output::format_row(repository.show_name(), repository.note(&self.note_key()))
    }
}

/// Help text for a proxy: the configured text if any, otherwise whatever
/// `git help <subcommand>` says.
pub fn help_text(git: &[String], configured: Option<&str>) -> String {
    if let Some(help) = configured {
        return help.to_string();
    }

    let fallback = "No help information available.".to_string();
    let Some(subcommand) = git.first() else {
        return fallback;
    };

    match Command::new("git").args(["help", subcommand]).output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        _ => fallback,
    }
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
