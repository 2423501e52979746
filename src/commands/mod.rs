//! # Commands
//!
//! The operations a run can apply to each repository, and the catalogue
//! that maps command names to them. Operations are a closed enum: the
//! engine and the report renderer know statically whether an operation
//! produces a table or lines and whether it needs the terminal, with no
//! runtime probing.
//!
//! Besides the built-ins, any of a fixed set of git subcommands passes
//! through as a proxy operation, and configuration files can register
//! further proxies under their own names.

pub mod echo;
pub mod exec;
pub mod list;
pub mod path;
pub mod proxy;

use std::collections::BTreeMap;

use crate::config::Settings;
use crate::engine::Execute;
use crate::error::{Error, Result};
use crate::output;
use crate::repository::Repository;

pub use echo::EchoOp;
pub use exec::ExecOp;
pub use list::ListOp;
pub use path::PathOp;
pub use proxy::ProxyOp;

/// Git subcommands that pass through as proxy commands out of the box.
pub const GIT_PASS_THROUGH: [&str; 9] = [
    "status", "fetch", "push", "pull", "log", "commit", "add", "remote", "branch",
];

/// One run's operation, ready to execute against repositories.
#[derive(Debug, Clone)]
pub enum Operation {
    List(ListOp),
    Echo(EchoOp),
    Exec(ExecOp),
    Path(PathOp),
    Proxy(ProxyOp),
}

impl Execute for Operation {
    fn interactive(&self) -> bool {
        match self {
            Operation::Exec(op) => op.interactive(),
            Operation::Proxy(op) => op.interactive(),
            Operation::List(_) | Operation::Echo(_) | Operation::Path(_) => false,
        }
    }

    fn execute(&self, repository: Repository) -> Option<Repository> {
        match self {
            Operation::List(op) => op.execute(repository),
            Operation::Echo(op) => op.execute(repository),
            Operation::Exec(op) => op.execute(repository),
            Operation::Path(op) => op.execute(repository),
            Operation::Proxy(op) => op.execute(repository),
        }
    }
}

/// Render the collated repositories as the operation's report.
pub fn report(operation: &Operation, repositories: &[Repository]) -> String {
    match operation {
        Operation::List(op) => table(repositories, op.header(), |r| op.rows(r)),
        Operation::Exec(op) => table(repositories, op.header(), |r| op.rows(r)),
        Operation::Proxy(op) => table(repositories, op.header(), |r| op.rows(r)),
        Operation::Echo(op) => lines(repositories, |r| op.line(r)),
        Operation::Path(op) => lines(repositories, |r| op.line(r)),
    }
}

fn table<F>(repositories: &[Repository], header: Vec<String>, render: F) -> String
where
    F: Fn(&Repository) -> Vec<Vec<String>>,
{
    let mut rows = Vec::with_capacity(repositories.len());
    for repository in repositories {
        rows.extend(render(repository));
    }
    output::text_table(Some(&header), &rows)
}

fn lines<F>(repositories: &[Repository], render: F) -> String
where
    F: Fn(&Repository) -> String,
{
    let mut out = String::new();
    for repository in repositories {
        let line = render(repository);
        if !line.is_empty() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// How a resolved command name should be handled.
#[derive(Debug)]
pub enum Dispatch {
    /// Run this operation through discovery and the worker pool.
    Run(Operation),
    /// Print this text; no repository work involved.
    Show(String),
    /// Print the usage summary and the command table.
    Usage,
}

/// What a name in the catalogue stands for.
#[derive(Debug, Clone)]
enum Entry {
    List,
    Echo,
    Exec,
    Path,
    Help,
    Version,
    Proxy {
        git: Vec<String>,
        usage: Option<String>,
        help: Option<String>,
        interactive: bool,
    },
}

/// Every command available in one run: built-ins, git pass-throughs and
/// configuration-registered proxies, keyed by name.
#[derive(Debug)]
pub struct Catalogue {
    entries: BTreeMap<String, Entry>,
}

impl Catalogue {
    /// Assemble the catalogue. Configured commands may shadow built-ins.
    pub fn new(settings: &Settings) -> Catalogue {
        let mut entries = BTreeMap::new();
        entries.insert("list".to_string(), Entry::List);
        entries.insert("echo".to_string(), Entry::Echo);
        entries.insert("exec".to_string(), Entry::Exec);
        entries.insert("path".to_string(), Entry::Path);
        entries.insert("help".to_string(), Entry::Help);
        entries.insert("version".to_string(), Entry::Version);

        for name in GIT_PASS_THROUGH {
            entries.insert(
                name.to_string(),
                Entry::Proxy {
                    git: vec![name.to_string()],
                    usage: None,
                    help: None,
                    interactive: false,
                },
            );
        }

        for (name, command) in settings.commands() {
            entries.insert(
                name.clone(),
                Entry::Proxy {
                    git: command.git.clone(),
                    usage: command.usage.clone(),
                    help: command.help.clone(),
                    interactive: command.interactive,
                },
            );
        }

        Catalogue { entries }
    }

    /// The `Commands are:` table body for the usage text, sorted by name.
    pub fn usage_table(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .entries
            .iter()
            .map(|(name, entry)| vec![format!("  {name}"), usage_of(name, entry)])
            .collect();
        output::text_table(None, &rows)
    }

    /// Help text for one command, if the name is known.
    pub fn help(&self, name: &str) -> Option<String> {
        self.entries.get(name).map(help_of)
    }

    /// Turn a command name and its arguments into something runnable.
    ///
    /// `interactive` is the `-i` flag; it only affects operations that can
    /// attach to the terminal.
    pub fn resolve(&self, name: &str, args: Vec<String>, interactive: bool) -> Result<Dispatch> {
        let entry = self.entries.get(name).ok_or_else(|| Error::UnknownCommand {
            name: name.to_string(),
        })?;

        let dispatch = match entry {
            Entry::List => Dispatch::Run(Operation::List(ListOp)),
            Entry::Echo => Dispatch::Run(Operation::Echo(EchoOp::new(args))),
            Entry::Exec => Dispatch::Run(Operation::Exec(ExecOp::new(args, interactive)?)),
            Entry::Path => Dispatch::Run(Operation::Path(PathOp::new(args))),
            Entry::Version => {
                Dispatch::Show(format!("githerd version {}", env!("CARGO_PKG_VERSION")))
            }
            Entry::Help => match args.first() {
                Some(topic) => Dispatch::Show(
                    self.help(topic)
                        .unwrap_or_else(|| format!("Unknown command \"{topic}\".")),
                ),
                None => Dispatch::Usage,
            },
            Entry::Proxy {
                git,
                interactive: configured,
                ..
            } => Dispatch::Run(Operation::Proxy(ProxyOp::new(
                name,
                git,
                args,
                interactive || *configured,
            ))),
        };
        Ok(dispatch)
    }
}

fn usage_of(name: &str, entry: &Entry) -> String {
    match entry {
        Entry::List => "List each repository with basic information.".to_string(),
        Entry::Echo => "Echo arguments after macro expansion.".to_string(),
        Entry::Exec => "Execute a command in each repository.".to_string(),
        Entry::Path => "Print the path of each repository.".to_string(),
        Entry::Help => "Show this help information.".to_string(),
        Entry::Version => "Show current version.".to_string(),
        Entry::Proxy { usage, .. } => usage
            .clone()
            .unwrap_or_else(|| format!("Run \"git {name}\".")),
    }
}

fn help_of(entry: &Entry) -> String {
    match entry {
        Entry::List => "List each repository with basic information.\n\n\
             Shown are:\n\
             \x20 Name         Repository path below the search root\n\
             \x20 Branch       Current branch\n\
             \x20 Status       Kinds of pending change in the working tree\n\
             \x20 Last commit  Author date of the last commit\n\
             \x20 Subject      Subject of the last commit"
            .to_string(),
        Entry::Echo => "Echo arguments after macro expansion.\n\n\
             Expands {{.Name}}, {{.Path}} and {{.CurrentBranch}} in the\n\
             remaining arguments and prints one line per repository.\n\
             Useful for testing macros."
            .to_string(),
        Entry::Exec => "Execute a command in each repository.\n\n\
             Expands macros in the arguments, then runs the first argument\n\
             as a program with the rest as its arguments, in each\n\
             repository's working directory."
            .to_string(),
        Entry::Path => "Print the path of each repository.\n\n\
             With an argument, only paths containing it are printed."
            .to_string(),
        Entry::Help => "Show help information.\n\n\
             Add a command name as argument for more information about\n\
             that command."
            .to_string(),
        Entry::Version => "Show current version.".to_string(),
        Entry::Proxy { git, help, .. } => proxy::help_text(git, help.as_deref()),
    }
}
