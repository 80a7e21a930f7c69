//! # Error Types: Rejection Taxonomy
//!
//! The gate surfaces exactly two failure kinds to submitters:
//!
//! - `Unauthorized`: the actor may not perform this mutation or deletion
//!   at all.
//! - `Forbidden`: the document content or structure violates an invariant
//!   (or a permitted actor attempted a change its role does not cover).
//!
//! Store-level failures (I/O, revision conflicts, network) are not
//! represented here; they belong to the store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which externally-visible failure a rejection maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Document content violates a structural or domain invariant.
    Forbidden,
    /// The actor lacks permission to perform the mutation.
    Unauthorized,
}

impl RejectionKind {
    /// Returns the snake_case identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::Unauthorized => "unauthorized",
        }
    }
}

impl std::fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected mutation attempt.
///
/// Evaluation is fail-fast, so a submitter only ever sees one rejection per
/// attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct Rejection {
    /// Forbidden or unauthorized.
    pub kind: RejectionKind,
    /// Human-readable reason naming the offending field or condition.
    pub message: String,
}

impl Rejection {
    /// A content/structure violation.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            kind: RejectionKind::Forbidden,
            message: message.into(),
        }
    }

    /// A permission violation.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: RejectionKind::Unauthorized,
            message: message.into(),
        }
    }

    /// Whether this is a `Forbidden` rejection.
    pub fn is_forbidden(&self) -> bool {
        self.kind == RejectionKind::Forbidden
    }

    /// Whether this is an `Unauthorized` rejection.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == RejectionKind::Unauthorized
    }
}

/// Error parsing a dotted field path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path text was empty.
    #[error("field path must not be empty")]
    Empty,

    /// A segment between two dots was empty (e.g. `a..b`).
    #[error("empty segment at position {position} in field path {path:?}")]
    EmptySegment {
        /// The full path text.
        path: String,
        /// Zero-based segment position.
        position: usize,
    },
}
