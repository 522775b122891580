//! Strongly-typed ID for comment entities.
//!
//! Comment IDs use ULID (Universally Unique Lexicographically Sortable
//! Identifier) format: generated server-side at insertion, unique, and
//! sortable in creation order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Unique identifier for a stored comment.
///
/// Generated by the comment store at insertion and immutable afterwards.
/// Displays with a `cmt_` prefix; parsing accepts both the prefixed form
/// and a raw ULID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(Ulid);

impl CommentId {
    /// Creates a new ID with a randomly generated ULID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Creates an ID from a ULID.
    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// Returns the underlying ULID.
    #[must_use]
    pub const fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmt_{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid_str = s.strip_prefix("cmt_").unwrap_or(s);

        Ulid::from_str(ulid_str).map(Self).map_err(|e| ParseIdError {
            id_type: "CommentId",
            reason: e.to_string(),
        })
    }
}

impl From<Ulid> for CommentId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        let a = CommentId::new();
        let b = CommentId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_includes_prefix() {
        let id = CommentId::new();
        assert!(id.to_string().starts_with("cmt_"));
    }

    #[test]
    fn parses_prefixed_form() {
        let id = CommentId::new();
        let parsed = CommentId::from_str(&id.to_string()).expect("parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn parses_raw_ulid() {
        let id = CommentId::new();
        let parsed = CommentId::from_str(&id.as_ulid().to_string()).expect("parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_garbage() {
        let err = CommentId::from_str("not-a-ulid").unwrap_err();
        assert_eq!(err.id_type, "CommentId");
    }

    #[test]
    fn serializes_as_transparent_string() {
        let id = CommentId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", id.as_ulid()));
    }
}
