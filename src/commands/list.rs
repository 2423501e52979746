//! # List Command
//!
//! The status summary table: one row per repository with its current
//! branch, the kinds of pending change in the working tree, and the author
//! date and subject of the last commit. Commit dates render relative to
//! now the way a person would say them: a date for anything older than
//! roughly a week, a weekday earlier in the week, `Today` for this
//! afternoon's work.

use chrono::{DateTime, Local, TimeZone, Timelike};

use crate::repository::Repository;

/// Placeholder for columns with nothing to show.
const EMPTY_COLUMN: &str = "-";

/// The `list` operation.
#[derive(Debug, Clone, Copy)]
pub struct ListOp;

impl ListOp {
    /// Gather branch, status and last-commit information into the
    /// repository's notes.
    pub fn execute(&self, mut repository: Repository) -> Option<Repository> {
        let branch = repository.current_branch();
        let status = repository.status_judgement();
        repository.put_note("list.branch", branch);
        repository.put_note("list.status", status);

        let mut author = EMPTY_COLUMN.to_string();
        let mut email = EMPTY_COLUMN.to_string();
        let mut time = EMPTY_COLUMN.to_string();
        let mut subject = EMPTY_COLUMN.to_string();

        // A repository without commits fails this; the columns stay "-".
        let (ok, log) = repository.run_git([
            "log",
            "--max-count=1",
            "--format=%an : %ae : %at : %s",
        ]);
        if ok {
            let log = log.trim_end_matches(['\r', '\n']);
            let fields: Vec<&str> = log.splitn(4, " : ").collect();
            if fields.len() == 4 {
                author = fields[0].to_string();
                email = fields[1].to_string();
                if let Ok(unix) = fields[2].parse::<i64>() {
                    if let Some(at) = Local.timestamp_opt(unix, 0).single() {
                        time = human_time(at, Local::now());
                    }
                }
                subject = fields[3].to_string();
            }
        }

        repository.put_note("list.author", author);
        repository.put_note("list.email", email);
        repository.put_note("list.time", time);
        repository.put_note("list.subject", subject);
        Some(repository)
    }

    pub fn header(&self) -> Vec<String> {
        ["Name", "Branch", "Status", "Last commit", "Subject"]
            .map(String::from)
            .to_vec()
    }

    pub fn rows(&self, repository: &Repository) -> Vec<Vec<String>> {
        vec![vec![
            repository.show_name().to_string(),
            repository.note("list.branch").to_string(),
            repository.note("list.status").to_string(),
            repository.note("list.time").to_string(),
            repository.note("list.subject").to_string(),
        ]]
    }
}

/// Render a commit time the way a person would say it.
fn human_time(at: DateTime<Local>, now: DateTime<Local>) -> String {
    let age = now.signed_duration_since(at);
    let format = if age.num_hours() >= 6 * 24 {
        "%Y-%m-%d"
    } else if age.num_hours() >= 4 || now.hour() < 4 {
        "%A, %H:%M"
    } else {
        "Today, %H:%M"
    };
    at.format(format).to_string()
}
