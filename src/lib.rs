//! # githerd
//!
//! Run git and shell commands across many repositories at once. A walk
//! below a root directory discovers working trees (following linked
//! worktree and submodule redirections), a filter chain narrows them down,
//! a small worker pool applies one operation to each, and the results come
//! back as one report in discovery order.
//!
//! The pipeline, end to end:
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use githerd::commands::{self, Catalogue, Dispatch};
//! use githerd::config::Settings;
//! use githerd::discovery::discover;
//! use githerd::engine;
//! use githerd::filter::FilterSet;
//!
//! let settings = Settings::load();
//! let catalogue = Catalogue::new(&settings);
//!
//! let dispatch = catalogue.resolve("echo", vec!["{{.Name}}".to_string()], false)?;
//! if let Dispatch::Run(operation) = dispatch {
//!     let input = discover(PathBuf::from("."), 0, FilterSet::default());
//!     let repositories = engine::run(input, &operation);
//!     print!("{}", commands::report(&operation, &repositories));
//! }
//! # Ok::<(), githerd::error::Error>(())
//! ```
//!
//! Discovery and execution overlap: the walk streams repositories through
//! a bounded channel while workers already run the operation against the
//! first finds. Only the final report is ordered.

pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod filter;
pub mod output;
pub mod repository;
