//! # Document Kinds
//!
//! The store holds six kinds of document, tagged by the top-level `type`
//! field. This is the one definition of that set; adding a kind forces
//! every `match` in the workspace to handle it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Name of the top-level field carrying the document kind.
pub const KIND_FIELD: &str = "type";

/// Name of the top-level field marking a deletion stub.
pub const DELETED_FIELD: &str = "_deleted";

/// Every document kind accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A planned or active balloon flight with payload configurations.
    Flight,
    /// A listener's station information (location, radio, antenna).
    ListenerInfo,
    /// A listener's own position report.
    ListenerTelemetry,
    /// A decoded telemetry sentence with its receiver reports.
    PayloadTelemetry,
    /// Service-wide configuration. Administrator-only.
    Config,
    /// Payload configurations used when no flight applies.
    Sandbox,
}

impl DocumentKind {
    /// All document kinds.
    pub fn all() -> &'static [DocumentKind] {
        &[
            Self::Flight,
            Self::ListenerInfo,
            Self::ListenerTelemetry,
            Self::PayloadTelemetry,
            Self::Config,
            Self::Sandbox,
        ]
    }

    /// The `type` field value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flight => "flight",
            Self::ListenerInfo => "listener_info",
            Self::ListenerTelemetry => "listener_telemetry",
            Self::PayloadTelemetry => "payload_telemetry",
            Self::Config => "config",
            Self::Sandbox => "sandbox",
        }
    }

    /// Whether only administrators may create or modify documents of this
    /// kind.
    pub fn is_admin_only(&self) -> bool {
        matches!(self, Self::Flight | Self::Config)
    }

    /// Read the kind tag of a document.
    ///
    /// Returns `None` when `type` is missing, not a string, or not one of
    /// the known kinds.
    pub fn of(document: &Value) -> Option<Self> {
        document
            .get(KIND_FIELD)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

/// Whether the candidate is a deletion stub (`"_deleted": true`).
pub fn is_deletion(document: &Value) -> bool {
    document
        .get(DELETED_FIELD)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown document kind: {s:?}"))
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
