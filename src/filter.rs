//! # Filter Chain
//!
//! Predicates that decide which discovered repositories take part in a run.
//! [`FilterArgs`] declares the command-line options the filters contribute,
//! [`Filter`] is one bound predicate, and [`FilterSet`] evaluates them in
//! order with short-circuit AND semantics.
//!
//! A flag that was not supplied (or was supplied empty) contributes no
//! filter at all. Supplying both the positive and negative form of the same
//! check is rejected up front rather than guessing which one wins.

use std::collections::HashMap;

use clap::Args;
use log::debug;

use crate::error::{Error, Result};
use crate::repository::Repository;

/// A fresh repository may not have written a ref file for its default
/// branch yet, so this branch is always assumed to exist.
const DEFAULT_BRANCH: &str = "master";

/// Filter options shared by every repository command.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Select only repositories whose name contains this text
    #[arg(long, value_name = "PARTIAL")]
    pub name: Option<String>,

    /// Select only repositories currently on this branch
    #[arg(long, value_name = "BRANCH")]
    pub current: Option<String>,

    /// Select only repositories with this branch
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Select only repositories without this branch
    #[arg(long, value_name = "BRANCH")]
    pub nobranch: Option<String>,

    /// Select only repositories with this tag
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Select only repositories without this tag
    #[arg(long, value_name = "TAG")]
    pub notag: Option<String>,

    /// Select only repositories with this remote
    #[arg(long, value_name = "REMOTE")]
    pub remote: Option<String>,

    /// Select only repositories without this remote
    #[arg(long, value_name = "REMOTE")]
    pub noremote: Option<String>,

    /// Select only repositories with a remote url containing this text
    #[arg(long, value_name = "PARTIAL")]
    pub remoteurl: Option<String>,

    /// Select only repositories without a remote url containing this text
    #[arg(long, value_name = "PARTIAL")]
    pub noremoteurl: Option<String>,
}

impl FilterArgs {
    /// Fill in options the command line left unset from a shortcut's
    /// values. Explicit flags always win over the shortcut.
    pub fn apply_shortcut(&mut self, values: &HashMap<String, String>) {
        let fields: [(&str, &mut Option<String>); 10] = [
            ("name", &mut self.name),
            ("current", &mut self.current),
            ("branch", &mut self.branch),
            ("nobranch", &mut self.nobranch),
            ("tag", &mut self.tag),
            ("notag", &mut self.notag),
            ("remote", &mut self.remote),
            ("noremote", &mut self.noremote),
            ("remoteurl", &mut self.remoteurl),
            ("noremoteurl", &mut self.noremoteurl),
        ];

        for (key, field) in fields {
            if field.is_none() {
                if let Some(value) = values.get(key) {
                    *field = Some(value.clone());
                }
            }
        }
    }
}

/// One bound predicate over a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Name(String),
    CurrentBranch(String),
    HasBranch(String),
    LacksBranch(String),
    HasTag(String),
    LacksTag(String),
    HasRemote(String),
    LacksRemote(String),
    RemoteUrlContains(String),
    RemoteUrlLacks(String),
}

impl Filter {
    /// Short label used when logging why a repository was skipped.
    fn kind(&self) -> &'static str {
        match self {
            Filter::Name(_) => "name",
            Filter::CurrentBranch(_) => "current",
            Filter::HasBranch(_) | Filter::LacksBranch(_) => "branch",
            Filter::HasTag(_) | Filter::LacksTag(_) => "tag",
            Filter::HasRemote(_) | Filter::LacksRemote(_) => "remote",
            Filter::RemoteUrlContains(_) | Filter::RemoteUrlLacks(_) => "remoteurl",
        }
    }

    /// Whether the repository passes this predicate.
    pub fn accepts(&self, repository: &mut Repository) -> bool {
        match self {
            Filter::Name(text) => repository.name().contains(text.as_str()),
            Filter::CurrentBranch(branch) => repository.current_branch() == *branch,
            Filter::HasBranch(branch) => {
                branch == DEFAULT_BRANCH || repository.branches().contains(branch)
            }
            Filter::LacksBranch(branch) => {
                branch != DEFAULT_BRANCH && !repository.branches().contains(branch)
            }
            Filter::HasTag(tag) => repository.tags().contains(tag),
            Filter::LacksTag(tag) => !repository.tags().contains(tag),
            Filter::HasRemote(remote) => repository.remotes().contains_key(remote),
            Filter::LacksRemote(remote) => !repository.remotes().contains_key(remote),
            Filter::RemoteUrlContains(text) => {
                repository.remotes().values().any(|url| url.contains(text))
            }
            Filter::RemoteUrlLacks(text) => {
                !repository.remotes().values().any(|url| url.contains(text))
            }
        }
    }
}

/// The ordered set of predicates for one run.
#[derive(Debug, Default, Clone)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// Build the chain from bound options.
    ///
    /// Options that are unset or empty contribute nothing. A positive and
    /// negative form of the same check supplied together is an error.
    pub fn from_args(args: &FilterArgs) -> Result<FilterSet> {
        let conflicts = [
            ("branch", &args.branch, "nobranch", &args.nobranch),
            ("tag", &args.tag, "notag", &args.notag),
            ("remote", &args.remote, "noremote", &args.noremote),
            ("remoteurl", &args.remoteurl, "noremoteurl", &args.noremoteurl),
        ];
        for (positive_flag, positive, negative_flag, negative) in conflicts {
            if given(positive).is_some() && given(negative).is_some() {
                return Err(Error::ConflictingFilters {
                    positive: positive_flag.to_string(),
                    negative: negative_flag.to_string(),
                });
            }
        }

        let mut filters = Vec::new();
        if let Some(text) = given(&args.name) {
            filters.push(Filter::Name(text.to_string()));
        }
        if let Some(branch) = given(&args.current) {
            filters.push(Filter::CurrentBranch(branch.to_string()));
        }
        if let Some(branch) = given(&args.branch) {
            filters.push(Filter::HasBranch(branch.to_string()));
        }
        if let Some(branch) = given(&args.nobranch) {
            filters.push(Filter::LacksBranch(branch.to_string()));
        }
        if let Some(tag) = given(&args.tag) {
            filters.push(Filter::HasTag(tag.to_string()));
        }
        if let Some(tag) = given(&args.notag) {
            filters.push(Filter::LacksTag(tag.to_string()));
        }
        if let Some(remote) = given(&args.remote) {
            filters.push(Filter::HasRemote(remote.to_string()));
        }
        if let Some(remote) = given(&args.noremote) {
            filters.push(Filter::LacksRemote(remote.to_string()));
        }
        if let Some(text) = given(&args.remoteurl) {
            filters.push(Filter::RemoteUrlContains(text.to_string()));
        }
        if let Some(text) = given(&args.noremoteurl) {
            filters.push(Filter::RemoteUrlLacks(text.to_string()));
        }

        Ok(FilterSet { filters })
    }

    /// Whether every predicate accepts the repository, stopping at the
    /// first that does not.
    pub fn accepts(&self, repository: &mut Repository) -> bool {
        for filter in &self.filters {
            if !filter.accepts(repository) {
                debug!(
                    "skipping repository \"{}\" (filtered by {})",
                    repository.show_name(),
                    filter.kind()
                );
                return false;
            }
        }
        true
    }

    /// Number of bound predicates.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True when no predicate is bound and every repository passes.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Treat unset and empty option values alike as "no constraint".
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
