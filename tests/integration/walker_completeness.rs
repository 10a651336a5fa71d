//! Integration tests for breadth-first traversal completeness

use std::collections::BTreeSet;
use std::path::PathBuf;
use unfurl::error::SourceError;
use unfurl::source::{MemoryTree, SourceTree};
use unfurl::tree::Walker;

fn visited_paths<S: SourceTree>(source: &S) -> Vec<PathBuf> {
    Walker::new(source)
        .entries()
        .unwrap()
        .iter()
        .map(|e| e.path())
        .collect()
}

fn depth(path: &PathBuf) -> usize {
    path.components().count()
}

#[test]
fn test_flat_tree() {
    let tree = MemoryTree::from_entries((0..50).map(|i| (format!("f{:02}.txt", i), "x"))).unwrap();
    let paths = visited_paths(&tree);
    assert_eq!(paths.len(), 50);
    assert!(paths.iter().all(|p| depth(p) == 1));
}

#[test]
fn test_single_child_chain() {
    let deep: String = (0..200).map(|i| format!("d{}/", i)).collect::<String>() + "leaf.txt";
    let tree = MemoryTree::from_entries([(deep.as_str(), "bottom")]).unwrap();

    let summary = Walker::new(&tree)
        .walk(|_, _| Ok::<(), SourceError>(()))
        .unwrap();
    // root + 200 chained directories
    assert_eq!(summary.directories_listed, 201);
    assert_eq!(summary.entries_visited, 201);

    let paths = visited_paths(&tree);
    assert_eq!(paths.last().unwrap(), &PathBuf::from(&deep));
}

#[test]
fn test_empty_directories_are_visited() {
    let mut tree = MemoryTree::new();
    tree.insert_dir("a/empty").unwrap();
    tree.insert_dir("b").unwrap();

    let paths = visited_paths(&tree);
    assert_eq!(
        paths,
        vec![
            PathBuf::from("a"),
            PathBuf::from("b"),
            PathBuf::from("a/empty"),
        ]
    );
}

#[test]
fn test_depth_never_decreases_between_levels() {
    let tree = MemoryTree::from_entries([
        ("z/1/2/3.txt", "x"),
        ("a/b.txt", "x"),
        ("m/n/o.txt", "x"),
        ("top.txt", "x"),
    ])
    .unwrap();

    let depths: Vec<usize> = visited_paths(&tree).iter().map(depth).collect();
    let mut sorted = depths.clone();
    sorted.sort();
    assert_eq!(depths, sorted, "visit order should be level by level");
}

#[test]
fn test_visit_order_is_deterministic() {
    let tree = super::test_utils::asset_bundle();
    let first = visited_paths(&tree);
    let second = visited_paths(&tree);
    assert_eq!(first, second);

    let unique: BTreeSet<_> = first.iter().collect();
    assert_eq!(unique.len(), first.len());
}
