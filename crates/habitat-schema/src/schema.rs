//! # Document Schema
//!
//! An ordered rule list for one document kind.

use serde_json::Value;

use habitat_core::{DocumentKind, Rejection};

use crate::rule::{check_all, SchemaRule};

/// The rule set for one [`DocumentKind`].
#[derive(Debug, Clone)]
pub struct Schema {
    kind: DocumentKind,
    rules: Vec<SchemaRule>,
}

impl Schema {
    /// Build a schema from rules in evaluation order.
    pub fn new(kind: DocumentKind, rules: Vec<SchemaRule>) -> Self {
        Self { kind, rules }
    }

    /// A schema with no rules; every document of the kind passes.
    pub fn empty(kind: DocumentKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// The document kind this schema governs.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Evaluate every rule in order; the first failure is the rejection.
    ///
    /// # Errors
    ///
    /// Returns a `Forbidden` [`Rejection`] for the first failing rule.
    pub fn validate(&self, document: &Value) -> Result<(), Rejection> {
        let result = check_all(&self.rules, document);
        if let Err(ref rejection) = result {
            tracing::debug!(
                kind = %self.kind,
                reason = %rejection.message,
                "document failed schema"
            );
        }
        result
    }
}
