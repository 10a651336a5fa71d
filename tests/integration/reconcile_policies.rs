//! Integration tests for the four reconciliation policies

use super::test_utils::{asset_bundle, dirs, scenario_source, snapshot, Node};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;
use unfurl::destination::LocalDestination;
use unfurl::error::ReconcileError;
use unfurl::reconcile::{self, PatchFill, Policy, ReconcileOptions, Reconciler};
use unfurl::source::{MemoryTree, SourceTree};

fn file(content: &str) -> Node {
    Node::File(content.as_bytes().to_vec())
}

#[test]
fn test_create_scenario() {
    let dest = TempDir::new().unwrap();
    reconcile::create(&scenario_source(), dest.path()).unwrap();

    let expected: BTreeMap<String, Node> = [
        ("a".to_string(), Node::Dir),
        ("a/b".to_string(), Node::Dir),
        ("a/b/y.txt".to_string(), file("world")),
        ("a/x.txt".to_string(), file("hello")),
    ]
    .into_iter()
    .collect();
    assert_eq!(snapshot(dest.path()), expected);
}

#[test]
fn test_touch_scenario() {
    let dest = TempDir::new().unwrap();
    reconcile::touch(&scenario_source(), dest.path()).unwrap();

    let expected: BTreeMap<String, Node> = [
        ("a".to_string(), Node::Dir),
        ("a/b".to_string(), Node::Dir),
        ("a/b/y.txt".to_string(), file("")),
        ("a/x.txt".to_string(), file("")),
    ]
    .into_iter()
    .collect();
    assert_eq!(snapshot(dest.path()), expected);
}

#[test]
fn test_tree_is_idempotent() {
    let dest = TempDir::new().unwrap();
    let source = asset_bundle();

    reconcile::tree(&source, dest.path()).unwrap();
    let first = snapshot(dest.path());
    reconcile::tree(&source, dest.path()).unwrap();
    let second = snapshot(dest.path());

    assert_eq!(first, second);
    assert!(first.values().all(|node| *node == Node::Dir));
    assert_eq!(
        dirs(&first),
        vec![
            "config",
            "templates",
            "templates/partials",
            "web",
            "web/static",
            "web/static/css",
            "web/uploads",
        ]
    );
}

#[test]
fn test_touch_and_patch_leave_existing_files_untouched() {
    for policy in [Policy::Touch, Policy::Patch] {
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(dest.path().join("a")).unwrap();
        fs::write(dest.path().join("a/x.txt"), "X").unwrap();

        let source = scenario_source();
        let local = LocalDestination::new(dest.path());
        let report = Reconciler::new(&source, &local).apply(policy).unwrap();

        assert_eq!(
            fs::read(dest.path().join("a/x.txt")).unwrap(),
            b"X",
            "{policy} modified an existing file"
        );
        assert_eq!(report.skipped, vec![std::path::PathBuf::from("a/x.txt")]);
    }
}

#[test]
fn test_patch_fills_gaps() {
    let source =
        MemoryTree::from_entries([("b/c.txt", "source c"), ("b/d.txt", "source d")]).unwrap();

    let dest = TempDir::new().unwrap();
    fs::create_dir_all(dest.path().join("b")).unwrap();
    fs::write(dest.path().join("b/d.txt"), "Y").unwrap();

    reconcile::patch(&source, dest.path()).unwrap();

    assert_eq!(fs::read(dest.path().join("b/c.txt")).unwrap(), b"");
    assert_eq!(fs::read(dest.path().join("b/d.txt")).unwrap(), b"Y");
}

#[test]
fn test_patch_with_source_fill_restores_content() {
    let source =
        MemoryTree::from_entries([("b/c.txt", "source c"), ("b/d.txt", "source d")]).unwrap();

    let dest = TempDir::new().unwrap();
    fs::create_dir_all(dest.path().join("b")).unwrap();
    fs::write(dest.path().join("b/d.txt"), "Y").unwrap();

    let local = LocalDestination::new(dest.path());
    Reconciler::new(&source, &local)
        .with_options(ReconcileOptions {
            patch_fill: PatchFill::Source,
        })
        .apply(Policy::Patch)
        .unwrap();

    assert_eq!(fs::read(dest.path().join("b/c.txt")).unwrap(), b"source c");
    assert_eq!(fs::read(dest.path().join("b/d.txt")).unwrap(), b"Y");
}

#[test]
fn test_create_fidelity_with_empty_files_and_dirs() {
    let source = asset_bundle();
    let dest = TempDir::new().unwrap();
    reconcile::create(&source, dest.path()).unwrap();

    let snap = snapshot(dest.path());
    for (path, content) in source.files() {
        assert_eq!(
            snap.get(path),
            Some(&Node::File(content.to_vec())),
            "mismatch at {path}"
        );
    }
    assert_eq!(snap.get("web/robots.txt"), Some(&Node::File(Vec::new())));
    assert_eq!(snap.get("web/uploads"), Some(&Node::Dir));
}

#[test]
fn test_create_overwrites_and_keeps_stale_files() {
    let dest = TempDir::new().unwrap();
    fs::create_dir_all(dest.path().join("a")).unwrap();
    fs::write(dest.path().join("a/x.txt"), "a much longer edited body").unwrap();
    fs::write(dest.path().join("a/stale.txt"), "stale").unwrap();

    let report = reconcile::create(&scenario_source(), dest.path()).unwrap();

    assert_eq!(fs::read_to_string(dest.path().join("a/x.txt")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(dest.path().join("a/stale.txt")).unwrap(), "stale");
    assert_eq!(report.written.len(), 2);
}

#[test]
fn test_create_twice_yields_same_tree() {
    let source = asset_bundle();
    let dest = TempDir::new().unwrap();

    reconcile::create(&source, dest.path()).unwrap();
    let first = snapshot(dest.path());
    reconcile::create(&source, dest.path()).unwrap();
    assert_eq!(first, snapshot(dest.path()));
}

#[test]
fn test_failure_keeps_earlier_work_and_stops() {
    let source = asset_bundle();
    let dest = TempDir::new().unwrap();
    // A file squatting where the `templates` directory belongs
    fs::write(dest.path().join("templates"), "in the way").unwrap();

    let err = reconcile::create(&source, dest.path()).unwrap_err();
    match &err {
        ReconcileError::CreateDir { path, .. } => {
            assert_eq!(path, &dest.path().join("templates"))
        }
        other => panic!("expected CreateDir, got {other}"),
    }

    // `config` sorts first and was created before the failure; nothing past it was
    assert!(dest.path().join("config").is_dir());
    assert!(!dest.path().join("config/default.toml").exists());
    assert!(!dest.path().join("web").exists());
}

#[test]
fn test_open_failure_propagates_as_source_error() {
    /// Lists a file that cannot be opened
    struct Unreadable;

    impl SourceTree for Unreadable {
        fn read_dir(
            &self,
            _dir: &std::path::Path,
        ) -> Result<Vec<unfurl::source::SourceEntry>, unfurl::error::SourceError> {
            Ok(vec![unfurl::source::SourceEntry::file("ghost.txt")])
        }

        fn open(
            &self,
            path: &std::path::Path,
        ) -> Result<Box<dyn std::io::Read + '_>, unfurl::error::SourceError> {
            Err(unfurl::error::SourceError::NotFound(path.to_path_buf()))
        }
    }

    let dest = TempDir::new().unwrap();
    let err = reconcile::create(&Unreadable, dest.path()).unwrap_err();
    assert!(matches!(err, ReconcileError::Source(_)));
    assert!(!dest.path().join("ghost.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_created_directories_use_fixed_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dest = TempDir::new().unwrap();
    reconcile::tree(&scenario_source(), dest.path()).unwrap();

    for dir in ["a", "a/b"] {
        let mode = fs::metadata(dest.path().join(dir))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o700, 0o700, "{dir} should be owner rwx");
        assert_eq!(mode & 0o022, 0, "{dir} should not be group/other writable");
    }
}

#[test]
fn test_apply_matches_free_functions() {
    let source = scenario_source();
    for policy in Policy::ALL {
        let via_fn = TempDir::new().unwrap();
        let via_apply = TempDir::new().unwrap();

        match policy {
            Policy::Tree => reconcile::tree(&source, via_fn.path()),
            Policy::Touch => reconcile::touch(&source, via_fn.path()),
            Policy::Create => reconcile::create(&source, via_fn.path()),
            Policy::Patch => reconcile::patch(&source, via_fn.path()),
        }
        .unwrap();

        let local = LocalDestination::new(via_apply.path());
        Reconciler::new(&source, &local).apply(policy).unwrap();

        assert_eq!(snapshot(via_fn.path()), snapshot(via_apply.path()), "{policy}");
    }
}
