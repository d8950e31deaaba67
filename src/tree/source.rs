//! Listing suppliers
//!
//! The builder does not run git itself. Anything that can name the root object
//! of a reference and enumerate its contents parent-first can feed it.

use crate::error::SourceError;
use crate::tree::listing::{self, LsTreeEntry};
use std::collections::HashMap;
use tracing::debug;

/// Supplies the root hash and flat listing of a reference
pub trait ListingSource {
    /// Content hash of the root tree of `reference`
    fn resolve(&self, reference: &str) -> Result<String, SourceError>;

    /// Parent-first flat listing of every object under `reference`
    fn list(&self, reference: &str) -> Result<Vec<LsTreeEntry>, SourceError>;
}

#[derive(Debug, Clone)]
struct Snapshot {
    root_sha: String,
    entries: Vec<LsTreeEntry>,
}

/// In-memory supplier holding pre-fetched listings keyed by reference
#[derive(Debug, Clone, Default)]
pub struct StaticListing {
    snapshots: HashMap<String, Snapshot>,
}

impl StaticListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register already parsed entries for `reference`
    pub fn insert(
        &mut self,
        reference: impl Into<String>,
        root_sha: impl Into<String>,
        entries: Vec<LsTreeEntry>,
    ) {
        let reference = reference.into();
        debug!(reference = %reference, entry_count = entries.len(), "Registered listing");
        self.snapshots.insert(
            reference,
            Snapshot {
                root_sha: root_sha.into(),
                entries,
            },
        );
    }

    /// Register raw `ls-tree -r -t` output for `reference`
    pub fn insert_text(
        &mut self,
        reference: impl Into<String>,
        root_sha: impl Into<String>,
        listing_text: &str,
    ) -> Result<(), SourceError> {
        let entries = listing::parse_listing(listing_text)?;
        self.insert(reference, root_sha, entries);
        Ok(())
    }

    /// Builder-style variant of [`StaticListing::insert_text`]
    pub fn with_text(
        mut self,
        reference: impl Into<String>,
        root_sha: impl Into<String>,
        listing_text: &str,
    ) -> Result<Self, SourceError> {
        self.insert_text(reference, root_sha, listing_text)?;
        Ok(self)
    }

    fn snapshot(&self, reference: &str) -> Result<&Snapshot, SourceError> {
        self.snapshots
            .get(reference)
            .ok_or_else(|| SourceError::UnknownReference(reference.to_string()))
    }
}

impl ListingSource for StaticListing {
    fn resolve(&self, reference: &str) -> Result<String, SourceError> {
        Ok(self.snapshot(reference)?.root_sha.clone())
    }

    fn list(&self, reference: &str) -> Result<Vec<LsTreeEntry>, SourceError> {
        Ok(self.snapshot(reference)?.entries.clone())
    }
}
