//! Shared test utilities for integration tests
//!
//! Snapshot helpers for comparing destination trees, plus the sample bundle
//! most tests reconcile.

use std::collections::BTreeMap;
use std::path::Path;
use unfurl::source::MemoryTree;
use walkdir::WalkDir;

/// One node of a destination snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
}

/// Everything under `root`, keyed by `/`-separated relative path
pub fn snapshot(root: &Path) -> BTreeMap<String, Node> {
    let mut nodes = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.unwrap();
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let node = if entry.file_type().is_dir() {
            Node::Dir
        } else {
            Node::File(std::fs::read(entry.path()).unwrap())
        };
        nodes.insert(rel, node);
    }
    nodes
}

/// Directory paths of a snapshot
pub fn dirs(snapshot: &BTreeMap<String, Node>) -> Vec<String> {
    snapshot
        .iter()
        .filter(|(_, node)| **node == Node::Dir)
        .map(|(path, _)| path.clone())
        .collect()
}

/// `{ "a/x.txt": "hello", "a/b/y.txt": "world" }`
pub fn scenario_source() -> MemoryTree {
    MemoryTree::from_entries([("a/x.txt", "hello"), ("a/b/y.txt", "world")]).unwrap()
}

/// A bundle shaped like a small web app's assets, with an empty directory
pub fn asset_bundle() -> MemoryTree {
    static ASSETS: &[(&str, &[u8])] = &[
        ("config/default.toml", b"port = 8080\n"),
        ("templates/base.html", b"<html>{{ body }}</html>"),
        ("templates/partials/nav.html", b"<nav></nav>"),
        ("web/index.html", b"<h1>hi</h1>"),
        ("web/robots.txt", b""),
        ("web/static/css/site.css", b"body { margin: 0 }"),
    ];
    let mut tree = MemoryTree::from_static(ASSETS).unwrap();
    tree.insert_dir("web/uploads").unwrap();
    tree
}
