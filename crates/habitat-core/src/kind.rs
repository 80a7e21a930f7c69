//! # Value Kinds
//!
//! Closed classification of JSON values used by schema rules. Arrays and
//! objects are told apart by shape; there is no "collection" kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The primitive kind of a document value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// JSON `null`.
    Null,
    /// `true` / `false`.
    Bool,
    /// Any JSON number, integer or float.
    Number,
    /// A JSON string.
    String,
    /// An ordered sequence.
    Array,
    /// A key/value mapping.
    Object,
}

impl ValueKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether `value` has this kind.
    pub fn matches(&self, value: &Value) -> bool {
        Self::of(value) == *self
    }

    /// Lowercase name used in rejection messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classification() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(false)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!(1)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!([])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
    }

    #[test]
    fn test_array_is_not_object() {
        assert!(!ValueKind::Object.matches(&json!([1, 2])));
        assert!(!ValueKind::Array.matches(&json!({"0": 1})));
    }
}
