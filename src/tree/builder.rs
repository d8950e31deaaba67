//! Tree builder for reconstructing a reference's hierarchy from a flat listing

use crate::error::BuildError;
use crate::error::ParseError;
use crate::tree::listing::{self, LsTreeEntry};
use crate::tree::node::{NodeId, RefTree};
use crate::tree::path;
use crate::tree::source::ListingSource;
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Reference resolved by [`TreeBuilder::head`]
pub const HEAD: &str = "HEAD";

/// Incrementally links listing entries under a root
///
/// Entries must arrive parent-first: a directory's own `tree` entry has to be
/// pushed before anything inside it. The builder never reorders its input.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: RefTree,
    /// Relative path -> node, for constant-time parent resolution
    index: HashMap<String, NodeId>,
}

impl TreeBuilder {
    /// Start a tree for `reference` whose root object is `root_sha`
    pub fn new(reference: impl Into<String>, root_sha: impl Into<String>) -> Self {
        Self {
            tree: RefTree::new(reference, root_sha),
            index: HashMap::new(),
        }
    }

    /// Link one entry under its already-built parent directory
    pub fn push(&mut self, entry: LsTreeEntry) -> Result<NodeId, BuildError> {
        trace!(path = %entry.path, kind = %entry.kind, "Linking entry");

        if entry.path.split(path::SEPARATOR).any(str::is_empty) {
            error!(path = %entry.path, "Empty segment in entry path");
            return Err(ParseError::MalformedEntry {
                line: entry.path.clone(),
                reason: "empty path segment".to_string(),
            }
            .into());
        }

        if self.index.contains_key(&entry.path) {
            error!(path = %entry.path, "Duplicate entry in listing");
            return Err(BuildError::DuplicateEntry(entry.path));
        }

        let (parent_path, name) = path::split_parent(&entry.path);
        let parent_id = match parent_path {
            None => NodeId::ROOT,
            Some(parent_path) => match self.index.get(parent_path) {
                Some(&id) if self.tree.get(id).is_some_and(|node| node.is_tree()) => id,
                _ => {
                    error!(path = %entry.path, parent = parent_path, "Parent directory not built yet");
                    return Err(BuildError::BrokenHierarchy {
                        path: entry.path.clone(),
                        parent: parent_path.to_string(),
                    });
                }
            },
        };

        let name = name.to_string();
        let id = self
            .tree
            .attach(parent_id, entry.kind, name, entry.sha, entry.mode);
        self.index.insert(entry.path, id);
        Ok(id)
    }

    /// Number of nodes linked so far, root included
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// True while only the root exists
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Hand over the finished tree
    pub fn finish(self) -> RefTree {
        self.tree
    }

    /// Build the hierarchy for `reference` from an ordered listing
    ///
    /// Fails on the first entry whose parent is missing; no partial tree is
    /// returned.
    #[instrument(skip_all, fields(reference = %reference, root_sha = %root_sha))]
    pub fn build<I>(reference: &str, root_sha: &str, entries: I) -> Result<RefTree, BuildError>
    where
        I: IntoIterator<Item = LsTreeEntry>,
    {
        let start = Instant::now();
        info!("Starting tree build");

        let mut builder = Self::new(reference, root_sha);
        for entry in entries {
            builder.push(entry)?;
        }
        let tree = builder.finish();

        info!(
            node_count = tree.len(),
            duration_ms = start.elapsed().as_millis(),
            "Tree build completed"
        );
        Ok(tree)
    }

    /// Parse raw `ls-tree -r -t` output and build from it
    pub fn build_from_listing(
        reference: &str,
        root_sha: &str,
        listing_text: &str,
    ) -> Result<RefTree, BuildError> {
        let entries = listing::parse_listing(listing_text).map_err(|e| {
            error!("Listing parse failed: {}", e);
            e
        })?;
        debug!(entry_count = entries.len(), "Parsed listing");
        Self::build(reference, root_sha, entries)
    }

    /// Build from an asynchronous source of entries
    ///
    /// Entries are consumed strictly in arrival order; the next item is only
    /// polled once the previous one is linked.
    #[instrument(skip_all, fields(reference = %reference, root_sha = %root_sha))]
    pub async fn build_from_stream<S, E>(
        reference: &str,
        root_sha: &str,
        mut entries: S,
    ) -> Result<RefTree, BuildError>
    where
        S: Stream<Item = Result<LsTreeEntry, E>> + Unpin,
        BuildError: From<E>,
    {
        let start = Instant::now();
        info!("Starting streamed tree build");

        let mut builder = Self::new(reference, root_sha);
        while let Some(entry) = entries.next().await {
            builder.push(entry?)?;
        }
        let tree = builder.finish();

        info!(
            node_count = tree.len(),
            duration_ms = start.elapsed().as_millis(),
            "Streamed tree build completed"
        );
        Ok(tree)
    }

    /// Resolve `reference` through a listing supplier and build its tree
    pub fn from_source<S>(source: &S, reference: &str) -> Result<RefTree, BuildError>
    where
        S: ListingSource + ?Sized,
    {
        let root_sha = source.resolve(reference)?;
        let entries = source.list(reference)?;
        debug!(reference, entry_count = entries.len(), "Fetched listing from source");
        Self::build(reference, &root_sha, entries)
    }

    /// Tree of the currently checked out commit
    pub fn head<S>(source: &S) -> Result<RefTree, BuildError>
    where
        S: ListingSource + ?Sized,
    {
        Self::from_source(source, HEAD)
    }
}
