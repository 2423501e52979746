//! # Command-Line Interface
//!
//! Argument parsing and dispatch. Global flags and the filter options come
//! first, then the command name and whatever arguments belong to it, which
//! pass through untouched (hyphens included).
//!
//! A `-s <shortcut>` preset fills in options the command line left unset;
//! explicit flags always win, including `--depth 0` to re-enable unlimited
//! depth over a shortcut's limit.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::warn;

use crate::commands::{self, Catalogue, Dispatch};
use crate::config::Settings;
use crate::discovery;
use crate::engine;
use crate::error::Error;
use crate::filter::{FilterArgs, FilterSet};

/// Run git and shell commands across many repositories at once.
#[derive(Parser, Debug)]
#[command(name = "githerd", version, about, long_about = None)]
pub struct Cli {
    /// Directory to search for repositories
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Maximum repository nesting depth, 0 for unlimited
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// Load a named flag preset from configuration
    #[arg(short = 's', long = "shortcut", value_name = "NAME")]
    pub shortcut: Option<String>,

    /// Attach the command to the terminal, one repository at a time
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Command to run against each matching repository
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Arguments passed to the command
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// Execute the parsed command line.
    pub fn execute(mut self) -> Result<()> {
        let settings = Settings::load();
        let catalogue = Catalogue::new(&settings);

        if let Some(name) = &self.shortcut {
            let values = match settings.shortcut(name) {
                Ok(values) => values,
                Err(err) => {
                    eprint!("{}", usage(&catalogue));
                    return Err(err.into());
                }
            };
            self.filters.apply_shortcut(values);

            if self.root.is_none() {
                if let Some(root) = values.get("root") {
                    self.root = Some(PathBuf::from(root));
                }
            }
            if self.depth.is_none() {
                if let Some(depth) = values.get("depth") {
                    match depth.parse() {
                        Ok(depth) => self.depth = Some(depth),
                        Err(_) => warn!("ignoring depth \"{depth}\" in shortcut \"{name}\""),
                    }
                }
            }
        }

        let Some(command) = self.command.take() else {
            print!("{}", usage(&catalogue));
            return Ok(());
        };

        let dispatch = match catalogue.resolve(&command, self.args.clone(), self.interactive) {
            Ok(dispatch) => dispatch,
            Err(err @ Error::UnknownCommand { .. }) => {
                eprint!("{}", usage(&catalogue));
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };

        match dispatch {
            Dispatch::Show(text) => println!("{text}"),
            Dispatch::Usage => print!("{}", usage(&catalogue)),
            Dispatch::Run(operation) => {
                let filters = FilterSet::from_args(&self.filters)?;
                let root = self.root.unwrap_or_else(|| PathBuf::from("."));
                let depth = self.depth.unwrap_or(0);

                let input = discovery::discover(root, depth, filters);
                let repositories = engine::run(input, &operation);
                print!("{}", commands::report(&operation, &repositories));
            }
        }

        Ok(())
    }
}

/// The usage text: a one-line synopsis plus the command table.
fn usage(catalogue: &Catalogue) -> String {
    format!(
        "usage: githerd [-s <shortcut>] [--root <dir>] [--depth <n>] [-i] [filters]\n\
         \x20              <command> [<args>]\n\
         \n\
         Commands are:\n\
         {}",
        catalogue.usage_table()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_flags_before_command() {
        let cli = parse(&[
            "githerd",
            "--root",
            "/work",
            "--depth",
            "2",
            "--branch",
            "develop",
            "list",
        ]);
        assert_eq!(cli.root.as_deref(), Some(std::path::Path::new("/work")));
        assert_eq!(cli.depth, Some(2));
        assert_eq!(cli.filters.branch.as_deref(), Some("develop"));
        assert_eq!(cli.command.as_deref(), Some("list"));
        assert!(cli.args.is_empty());
    }

    #[test]
    fn test_parse_command_arguments_pass_through() {
        let cli = parse(&["githerd", "log", "--oneline", "-n", "3"]);
        assert_eq!(cli.command.as_deref(), Some("log"));
        assert_eq!(cli.args, ["--oneline", "-n", "3"]);
    }

    #[test]
    fn test_parse_no_command() {
        let cli = parse(&["githerd"]);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_parse_shortcut_and_interactive() {
        let cli = parse(&["githerd", "-s", "work", "-i", "pull"]);
        assert_eq!(cli.shortcut.as_deref(), Some("work"));
        assert!(cli.interactive);
        assert_eq!(cli.command.as_deref(), Some("pull"));
    }

    #[test]
    fn test_usage_mentions_the_builtins() {
        let usage = usage(&Catalogue::new(&Settings::default()));
        assert!(usage.starts_with("usage: githerd"));
        assert!(usage.contains("Commands are:"));
        assert!(usage.contains("  list"));
        assert!(usage.contains("  exec"));
    }
}
