//! Commit records parsed from a single `git log` line.
//!
//! The line shape is produced by [`LOG_FORMAT`]: ten comma separated fields where
//! the last one (the title) is free text and may itself contain commas.

use crate::error::ParseError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;

/// Pretty format passed to `git log --pretty=format:` to obtain parseable lines
pub const LOG_FORMAT: &str = "%H,%T,%P,%an,%ae,%ad,%cn,%ce,%cd,%s";

/// Field delimiter of a log line
pub const DELIMITER: &str = ",";

/// Number of fields in a well formed line
pub const FIELD_COUNT: usize = 10;

/// Date layouts tried, in order, when interpreting raw author/committer dates
const DATE_FORMATS: &[&str] = &[
    // git default (`--date=default`)
    "%a %b %e %H:%M:%S %Y %z",
    // `--date=iso`
    "%Y-%m-%d %H:%M:%S %z",
    // `--date=raw`
    "%s %z",
];

/// A commit as described by one log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub tree_sha: String,
    /// Empty for a root commit, two or more for a merge
    pub parents: Vec<String>,
    pub author_name: String,
    pub author_email: String,
    pub author_date: String,
    pub committer_name: String,
    pub committer_email: String,
    pub committer_date: String,
    pub title: String,
}

impl CommitRecord {
    /// Parse a single log line.
    ///
    /// The line is split on every comma. The first nine tokens map to the fixed
    /// fields and everything after the ninth comma is rejoined to rebuild the title.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let tokens: Vec<&str> = line.split(DELIMITER).collect();

        if tokens.len() < FIELD_COUNT {
            return Err(ParseError::MalformedRecord {
                expected: FIELD_COUNT,
                found: tokens.len(),
            });
        }
        if tokens[0].is_empty() {
            // A record without a sha is as unusable as a truncated one
            return Err(ParseError::MalformedRecord {
                expected: FIELD_COUNT,
                found: tokens.len(),
            });
        }

        let record = Self {
            sha: tokens[0].to_string(),
            tree_sha: tokens[1].to_string(),
            parents: tokens[2].split_whitespace().map(str::to_string).collect(),
            author_name: tokens[3].to_string(),
            author_email: tokens[4].to_string(),
            author_date: tokens[5].to_string(),
            committer_name: tokens[6].to_string(),
            committer_email: tokens[7].to_string(),
            committer_date: tokens[8].to_string(),
            title: tokens[FIELD_COUNT - 1..].join(DELIMITER),
        };
        trace!(sha = %record.sha, parents = record.parents.len(), "Parsed commit record");

        Ok(record)
    }

    /// True for a commit without parents
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// True for a commit with two or more parents
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Author date interpreted as a timestamp, if it is in a recognised layout
    pub fn authored_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_git_date(&self.author_date)
    }

    /// Committer date interpreted as a timestamp, if it is in a recognised layout
    pub fn committed_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_git_date(&self.committer_date)
    }

    /// Fixed-key JSON rendering
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl FromStr for CommitRecord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a multi-line log, one record per non-blank line.
///
/// Fails on the first malformed line, reporting its 1-based line number.
pub fn parse_log(text: &str) -> Result<Vec<CommitRecord>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            CommitRecord::parse(line).map_err(|e| ParseError::MalformedLogLine {
                line: index + 1,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Interpret a raw git date string
fn parse_git_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date);
    }
    let raw = raw.strip_prefix('@').unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
}
