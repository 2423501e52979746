//! Benchmarks for repository discovery.
//!
//! These benchmarks measure the walk over a synthetic tree of bare-metadata
//! repositories, which dominates start-up time on large checkouts.

use std::fs;
use std::path::Path;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

use githerd::discovery::discover;
use githerd::filter::{FilterArgs, FilterSet};

/// Lays down `repos` repositories spread over `groups` top-level
/// directories, each with just enough metadata to be discovered.
fn create_tree(groups: usize, repos: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..repos {
        let work_dir = dir.path().join(format!("group{}/repo{}", i % groups, i));
        scaffold_repo(&work_dir);
    }
    dir
}

fn scaffold_repo(work_dir: &Path) {
    let git_dir = work_dir.join(".git");
    fs::create_dir_all(git_dir.join("refs/heads")).unwrap();
    fs::create_dir_all(git_dir.join("refs/tags")).unwrap();
    fs::write(git_dir.join("refs/heads/develop"), "0000\n").unwrap();
    fs::write(
        git_dir.join("config"),
        "[remote \"origin\"]\n\turl = git@example.com:acme/repo.git\n",
    )
    .unwrap();
}

/// Drain the discovery channel and return how many repositories came out.
fn drain(root: &Path, filters: FilterSet) -> usize {
    discover(root.to_path_buf(), 0, filters).iter().count()
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery_walk");

    for count in [10, 100, 500] {
        let tree = create_tree(10, count);
        group.bench_with_input(BenchmarkId::new("unfiltered", count), &count, |b, &count| {
            b.iter(|| {
                let found = drain(tree.path(), FilterSet::default());
                assert_eq!(found, count);
                found
            })
        });
    }

    group.finish();
}

fn bench_filtered_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery_filters");
    let tree = create_tree(10, 200);

    // Name filtering needs no metadata reads per repository.
    let by_name = FilterSet::from_args(&FilterArgs {
        name: Some("repo1".to_string()),
        ..FilterArgs::default()
    })
    .unwrap();
    group.bench_function("name", |b| b.iter(|| drain(tree.path(), by_name.clone())));

    // Branch filtering opens the refs layout of every candidate.
    let by_branch = FilterSet::from_args(&FilterArgs {
        branch: Some("develop".to_string()),
        ..FilterArgs::default()
    })
    .unwrap();
    group.bench_function("branch", |b| {
        b.iter(|| drain(tree.path(), by_branch.clone()))
    });

    // Remote url filtering parses the configuration of every candidate.
    let by_url = FilterSet::from_args(&FilterArgs {
        remoteurl: Some("example.com".to_string()),
        ..FilterArgs::default()
    })
    .unwrap();
    group.bench_function("remoteurl", |b| {
        b.iter(|| drain(tree.path(), by_url.clone()))
    });

    group.finish();
}

criterion_group!(benches, bench_walk, bench_filtered_walk);
criterion_main!(benches);
