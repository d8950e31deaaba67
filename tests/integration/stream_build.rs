//! Integration tests for building from an asynchronous entry stream

use super::test_utils::{PROJECT_LISTING, PROJECT_ROOT_SHA};
use futures::stream;
use reftree::{BuildError, LsTreeEntry, ParseError, TreeBuilder};

/// A stream of parsed lines builds the same tree as the synchronous path
#[tokio::test]
async fn test_stream_matches_sync_build() {
    let entries = PROJECT_LISTING
        .lines()
        .map(|line| line.parse::<LsTreeEntry>());
    let streamed = TreeBuilder::build_from_stream("HEAD", PROJECT_ROOT_SHA, stream::iter(entries))
        .await
        .unwrap();
    let direct = TreeBuilder::build_from_listing("HEAD", PROJECT_ROOT_SHA, PROJECT_LISTING).unwrap();

    let streamed_paths: Vec<_> = streamed.traverse().map(|n| n.relative_path()).collect();
    let direct_paths: Vec<_> = direct.traverse().map(|n| n.relative_path()).collect();
    assert_eq!(streamed_paths, direct_paths);
}

/// Stream item errors stop the build
#[tokio::test]
async fn test_stream_parse_error_propagates() {
    let lines = vec!["040000 tree a\tsrc", "160000 commit b\tsrc/vendor"];
    let entries = lines.into_iter().map(|line| line.parse::<LsTreeEntry>());
    let err = TreeBuilder::build_from_stream("HEAD", "root", stream::iter(entries))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Listing(ParseError::UnsupportedEntryType { .. })
    ));
}

/// Ordering is enforced on streamed input too
#[tokio::test]
async fn test_stream_out_of_order_fails() {
    let lines = vec!["100644 blob b\tsrc/main.rb", "040000 tree a\tsrc"];
    let entries = lines.into_iter().map(|line| line.parse::<LsTreeEntry>());
    let err = TreeBuilder::build_from_stream("HEAD", "root", stream::iter(entries))
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::BrokenHierarchy { .. }));
}
