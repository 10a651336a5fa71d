//! Property-based tests for traversal completeness

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use unfurl::error::SourceError;
use unfurl::source::MemoryTree;
use unfurl::tree::Walker;

/// Relative file paths; directories are `d*`, files are `f*`, so the two never collide
fn file_paths() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (prop::collection::vec(0u8..4, 0..5), 0u8..4),
        1..40,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .map(|(dirs, file)| {
                let mut path: String = dirs.iter().map(|d| format!("d{}/", d)).collect();
                path.push_str(&format!("f{}", file));
                path
            })
            .collect()
    })
}

/// Every path the tree implies: each file plus all of its ancestor directories
fn expected_paths(files: &[String]) -> BTreeSet<PathBuf> {
    let mut all = BTreeSet::new();
    for file in files {
        let path = PathBuf::from(file);
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                all.insert(ancestor.to_path_buf());
            }
        }
    }
    all
}

/// Test that every entry is visited exactly once
#[test]
fn test_walk_visits_every_entry_once_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&file_paths(), |files| {
            let tree = MemoryTree::from_entries(files.iter().map(|f| (f.as_str(), "x"))).unwrap();

            let mut counts: BTreeMap<PathBuf, usize> = BTreeMap::new();
            Walker::new(&tree)
                .walk(|dir, entry| {
                    *counts.entry(dir.join(entry.name())).or_default() += 1;
                    Ok::<(), SourceError>(())
                })
                .unwrap();

            let visited: BTreeSet<PathBuf> = counts.keys().cloned().collect();
            prop_assert_eq!(visited, expected_paths(&files));
            prop_assert!(counts.values().all(|&n| n == 1));
            Ok(())
        })
        .unwrap();
}

/// Test that parents are always visited before their children
#[test]
fn test_walk_is_breadth_first_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&file_paths(), |files| {
            let tree = MemoryTree::from_entries(files.iter().map(|f| (f.as_str(), "x"))).unwrap();
            let paths: Vec<PathBuf> = Walker::new(&tree)
                .entries()
                .unwrap()
                .iter()
                .map(|e| e.path())
                .collect();

            let depths: Vec<usize> = paths.iter().map(|p| p.components().count()).collect();
            prop_assert!(depths.windows(2).all(|w| w[0] <= w[1]));

            for (i, path) in paths.iter().enumerate() {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    let parent_at = paths.iter().position(|p| p == parent);
                    prop_assert!(matches!(parent_at, Some(at) if at < i));
                }
            }
            Ok(())
        })
        .unwrap();
}
