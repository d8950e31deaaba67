//! Flat recursive listings as printed by `git ls-tree -r -t`
//!
//! Each line is `<mode> <type> <sha>\t<path>`. Directories appear as their own
//! `tree` entries before anything below them.

use crate::error::ParseError;
use crate::tree::node::EntryKind;
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Arguments a supplier passes to git to obtain a listing for `<ref>`
pub const LS_TREE_ARGS: &[&str] = &["ls-tree", "-r", "-t"];

/// One line of a flat listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsTreeEntry {
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub sha: String,
    /// Repository-relative path, already unquoted
    pub path: String,
}

impl LsTreeEntry {
    pub fn new(
        mode: impl Into<String>,
        kind: EntryKind,
        sha: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            mode: mode.into(),
            kind,
            sha: sha.into(),
            path: path.into(),
        }
    }

    /// Parse a single listing line
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let malformed = |reason: &str| ParseError::MalformedEntry {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let (header, raw_path) = line
            .split_once('\t')
            .ok_or_else(|| malformed("missing tab before path"))?;

        let fields: Vec<&str> = header.split_whitespace().collect();
        let &[mode, kind, sha] = fields.as_slice() else {
            return Err(malformed("expected `<mode> <type> <sha>` before the tab"));
        };

        let path = path::unquote(raw_path).map_err(|reason| malformed(&reason))?;
        if path.is_empty() {
            return Err(malformed("empty path"));
        }

        let kind = match kind {
            "blob" => EntryKind::Blob,
            "tree" => EntryKind::Tree,
            other => {
                return Err(ParseError::UnsupportedEntryType {
                    kind: other.to_string(),
                    path,
                })
            }
        };

        Ok(Self {
            mode: mode.to_string(),
            kind,
            sha: sha.to_string(),
            path,
        })
    }
}

impl FromStr for LsTreeEntry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a whole listing, keeping line order and skipping blank lines
///
/// Only leading whitespace and the line terminator are dropped. Paths keep
/// trailing spaces, which git prints unquoted.
pub fn parse_listing(text: &str) -> Result<Vec<LsTreeEntry>, ParseError> {
    text.lines()
        .map(|line| line.trim_end_matches('\r').trim_start())
        .filter(|line| !line.trim_end().is_empty())
        .map(LsTreeEntry::parse)
        .collect()
}
