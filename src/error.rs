//! # Error Handling
//!
//! Centralized error type for the `githerd` library, built with `thiserror`.
//!
//! Most per-repository problems are deliberately *not* errors: a candidate
//! that cannot be read during discovery is logged and skipped, and a child
//! process that fails inside a worker is captured into that repository's
//! notes and shown as its report row. The variants here cover the cases
//! that abort a run before the pipeline starts: bad command lines,
//! unresolvable shortcuts, and unknown commands.

use thiserror::Error;

/// Main error type for githerd operations
#[derive(Error, Debug)]
pub enum Error {
    /// The named command is not a built-in, a git pass-through, or a
    /// configured custom command.
    #[error("unknown command \"{name}\"")]
    UnknownCommand { name: String },

    /// A shortcut was requested with `-s` but no configuration file
    /// defines it.
    #[error("could not find shortcut \"{name}\"{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    UnknownShortcut {
        name: String,
        /// Optional hint for where the shortcut should be defined
        hint: Option<String>,
    },

    /// The positive and negative form of the same filter were both
    /// supplied, either on the command line or after merging a shortcut.
    #[error("conflicting filters: --{positive} and --{negative} cannot be combined")]
    ConflictingFilters { positive: String, negative: String },

    /// A command was invoked without an argument it requires.
    #[error("missing argument for {command}: {expected}")]
    MissingArgument { command: String, expected: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
