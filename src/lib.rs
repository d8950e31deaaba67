//! Reftree: Read-only Snapshots of Git References
//!
//! Parses the plumbing output of a git repository into typed values: commit
//! records from `git log` lines, and a linked file/directory hierarchy from the
//! flat listing of a reference. Running git is left to the caller.

pub mod commit;
pub mod config;
pub mod error;
pub mod logging;
pub mod tree;

pub use commit::{parse_log, CommitRecord};
pub use error::{BuildError, ConfigError, ParseError, SourceError};
pub use tree::{
    EntryKind, ListingSource, LsTreeEntry, NodeId, NodeRef, RefTree, StaticListing, TreeBuilder,
};
