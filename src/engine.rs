//! # Fan-Out Execution
//!
//! The worker pool that applies one operation to every discovered
//! repository, and the collation step that restores discovery order
//! afterwards. Workers pull from the discovery channel, so a slow
//! repository never holds up the others; completion order is arbitrary and
//! the sequence sort at the end is what makes reports deterministic.
//!
//! Operations that attach a child process to the terminal run with a single
//! worker. Two children reading one terminal at once is never safe, so the
//! pool collapses rather than interleave them.

use std::thread;

use flume::Receiver;
use log::debug;

use crate::repository::Repository;

/// Workers pulling repositories in a batch run.
pub const WORKERS: usize = 5;

/// One run's unit of work, applied to each repository by the pool.
///
/// Implementations must be callable from several workers at once unless
/// they declare themselves interactive.
pub trait Execute: Sync {
    /// Whether the operation needs the terminal to itself. Interactive
    /// operations are serialized onto a single worker.
    fn interactive(&self) -> bool;

    /// Apply the operation to one repository. The returned descriptor, not
    /// the argument, flows into the report; `None` drops the repository
    /// from the report entirely.
    fn execute(&self, repository: Repository) -> Option<Repository>;
}

/// Drain the discovery channel through a worker pool and collate.
///
/// Returns the kept repositories sorted back into discovery order. The
/// call blocks until the walk has completed and every worker has finished.
pub fn run(input: Receiver<Repository>, operation: &dyn Execute) -> Vec<Repository> {
    let workers = if operation.interactive() { 1 } else { WORKERS };
    debug!("running with {workers} worker(s)");

    let (done_tx, done_rx) = flume::bounded(WORKERS);

    let mut results: Vec<Repository> = thread::scope(|scope| {
        for _ in 0..workers {
            let input = input.clone();
            let done = done_tx.clone();
            scope.spawn(move || {
                for repository in input.iter() {
                    if let Some(repository) = operation.execute(repository) {
                        if done.send(repository).is_err() {
                            return;
                        }
                    }
                }
            });
        }
        // Workers hold the remaining sender clones; the drain below ends
        // when the last of them finishes.
        drop(done_tx);

        done_rx.iter().collect()
    });

    results.sort_by_key(Repository::sequence);
    results
}
