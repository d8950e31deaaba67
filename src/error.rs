//! Error types for commit parsing, listing parsing and tree reconstruction.

use thiserror::Error;

/// Errors raised while tokenizing plumbing output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed commit record: expected at least {expected} fields, found {found}")]
    MalformedRecord { expected: usize, found: usize },

    #[error("Malformed commit record on line {line}: {source}")]
    MalformedLogLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },

    #[error("Malformed listing entry {line:?}: {reason}")]
    MalformedEntry { line: String, reason: String },

    #[error("Unsupported entry type {kind:?} for path {path:?}")]
    UnsupportedEntryType { kind: String, path: String },
}

/// Errors raised by a listing supplier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    #[error("Listing error: {0}")]
    Listing(#[from] ParseError),
}

/// Errors raised while linking entries into a hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Broken hierarchy: parent {parent:?} of {path:?} is not a directory in the tree built so far")]
    BrokenHierarchy { path: String, parent: String },

    #[error("Duplicate entry: {0:?} already exists in the tree")]
    DuplicateEntry(String),

    #[error("Listing error: {0}")]
    Listing(#[from] ParseError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
