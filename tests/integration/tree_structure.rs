//! Integration tests for tree structure correctness

use super::test_utils::{PROJECT_LISTING, PROJECT_ROOT_SHA};
use reftree::{BuildError, EntryKind, TreeBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The README / src / main.rb listing links as documented
#[test]
fn test_readme_and_src_listing() {
    let text = "100644 blob sha1\tREADME.md\n040000 tree sha2\tsrc\n100644 blob sha3\tsrc/main.rb\n";
    let tree = TreeBuilder::build_from_listing("HEAD", "root", text).unwrap();

    let root_children: Vec<_> = tree
        .root()
        .children()
        .map(|c| (c.name().to_string(), c.kind()))
        .collect();
    assert_eq!(
        root_children,
        vec![
            ("README.md".to_string(), EntryKind::Blob),
            ("src".to_string(), EntryKind::Tree)
        ]
    );

    let src = tree.lookup("src").unwrap();
    let src_children: Vec<_> = src.children().map(|c| (c.name(), c.kind())).collect();
    assert_eq!(src_children, vec![("main.rb", EntryKind::Blob)]);

    let main = tree.lookup("src/main.rb").unwrap();
    assert_eq!(main.relative_path(), "src/main.rb");
    assert_eq!(main.parent(), Some(src));
}

/// Every traversed node can be found again by its own path
#[test]
fn test_lookup_round_trips_every_node() {
    let tree = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    for node in tree.traverse() {
        assert_eq!(tree.lookup(&node.relative_path()), Some(node));
    }
}

/// Traversal visits every node once and parents before children
#[test]
fn test_traversal_visits_each_node_once_after_parent() {
    let tree = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    let mut seen = HashSet::new();
    for node in tree.traverse() {
        if let Some(parent) = node.parent() {
            assert!(seen.contains(&parent.id()), "{} visited before its parent", node.relative_path());
        }
        assert!(seen.insert(node.id()), "{} visited twice", node.relative_path());
    }
    assert_eq!(seen.len(), tree.len());
    assert_eq!(tree.len(), 10);
}

/// Traversal order follows the listing, which is already pre-order
#[test]
fn test_traversal_order_matches_listing() {
    let tree = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    let paths: Vec<_> = tree.traverse().skip(1).map(|n| n.relative_path()).collect();
    let listed: Vec<_> = PROJECT_LISTING
        .lines()
        .map(|line| line.split_once('\t').unwrap().1.to_string())
        .collect();
    assert_eq!(paths, listed);
}

/// The root carries the reference name and root hash
#[test]
fn test_root_identity_and_paths() {
    let tree = TreeBuilder::build_from_listing("main", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    let root = tree.root();
    assert!(root.is_root());
    assert!(root.is_tree());
    assert_eq!(root.name(), "main");
    assert_eq!(root.sha(), PROJECT_ROOT_SHA);
    assert_eq!(tree.reference(), "main");

    for root_path in ["/srv/repo", "relative/checkout", "/"] {
        assert_eq!(root.absolute_path(Path::new(root_path)), PathBuf::from(root_path));
    }
    assert_eq!(
        tree.lookup("lib/core/tree.rb")
            .unwrap()
            .absolute_path(Path::new("/srv/repo")),
        PathBuf::from("/srv/repo/lib/core/tree.rb")
    );
}

/// Lookup from an inner node resolves relative to that node
#[test]
fn test_lookup_from_subtree() {
    let tree = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    let lib = tree.lookup("lib").unwrap();
    let parser = lib.lookup("core/parser.rb").unwrap();
    assert_eq!(parser.sha(), "111111");
    assert_eq!(parser.relative_path(), "lib/core/parser.rb");
    assert!(lib.lookup("spec").is_none());
    assert!(tree.lookup("lib/core/missing.rb").is_none());
}

/// Blob listing skips directories
#[test]
fn test_blobs_only_files() {
    let tree = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    let blobs: Vec<_> = tree.blobs().map(|n| n.relative_path()).collect();
    assert_eq!(
        blobs,
        vec![
            ".gitignore",
            "README.md",
            "lib/core/parser.rb",
            "lib/core/tree.rb",
            "lib/version.rb",
            "spec/tree_spec.rb"
        ]
    );
    assert!(tree.blobs().all(|n| n.children().len() == 0));
}

/// A file listed before its directory breaks the build
#[test]
fn test_out_of_order_listing_fails() {
    let text = "100644 blob sha3\tsrc/main.rb\n040000 tree sha2\tsrc\n";
    let err = TreeBuilder::build_from_listing("HEAD", "root", text).unwrap_err();
    assert!(matches!(err, BuildError::BrokenHierarchy { .. }));
}

/// A listing missing an intermediate directory breaks the build
#[test]
fn test_missing_intermediate_directory_fails() {
    let text = "040000 tree a\tlib\n100644 blob b\tlib/core/parser.rb\n";
    match TreeBuilder::build_from_listing("HEAD", "root", text).unwrap_err() {
        BuildError::BrokenHierarchy { path, parent } => {
            assert_eq!(path, "lib/core/parser.rb");
            assert_eq!(parent, "lib/core");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// The hierarchy serializes as nested JSON
#[test]
fn test_tree_serializes_to_json() {
    let tree = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["reference"], "HEAD");
    assert_eq!(json["sha"], PROJECT_ROOT_SHA);

    let lib = &json["root"]["children"][2];
    assert_eq!(lib["name"], "lib");
    assert_eq!(lib["type"], "tree");
    assert_eq!(lib["mode"], "040000");
    assert_eq!(lib["children"][0]["children"][1]["path"], "lib/core/tree.rb");
}

/// Independent builds share nothing
#[test]
fn test_builds_are_independent() {
    let first = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    let second = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();
    let a = first.lookup("README.md").unwrap();
    let b = second.lookup("README.md").unwrap();
    assert_eq!(a.id(), b.id());
    assert_ne!(a, b);
}
