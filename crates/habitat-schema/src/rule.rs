//! # Schema Rules
//!
//! A [`SchemaRule`] is one declarative check against a document. Rules are
//! evaluated in declared order and the first failure is the rejection;
//! there is no error accumulation.
//!
//! ## Rule Set
//!
//! | Rule | Fails when |
//! |------|------------|
//! | `Required` | path absent, or value has the wrong [`ValueKind`] |
//! | `RequiredIf` | predicate holds and the `Required` check fails |
//! | `OneOf` | value is not one of the allowed strings (case-sensitive) |
//! | `Equals` | value differs from the expected value |
//! | `Custom` | predicate over the whole document is false |
//! | `When` | predicate holds and a nested rule fails |
//! | `Each` | a rule expanded for one container entry fails |
//!
//! `When` and `Each` exist because payload configurations are keyed by
//! callsign and carry ordered field and filter lists: the rules for an entry
//! depend on its path and key, which are only known while evaluating.

use std::sync::Arc;

use serde_json::Value;

use habitat_core::{FieldPath, Rejection, ValueKind};

/// A condition over the whole candidate document.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Builds the failure message for a `Custom` rule from the document.
pub type MessageFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Produces the rules for one entry of a container, given the entry's path
/// and its key (object key or decimal array index).
pub type Expand = fn(&FieldPath, &str) -> Vec<SchemaRule>;

/// One declarative check.
#[derive(Clone)]
pub enum SchemaRule {
    /// The field must exist and have the given kind.
    Required {
        /// Field location.
        path: FieldPath,
        /// Expected kind.
        kind: ValueKind,
    },
    /// As `Required`, but only when `when` holds.
    RequiredIf {
        /// Field location.
        path: FieldPath,
        /// Expected kind.
        kind: ValueKind,
        /// Condition under which the field is required.
        when: Predicate,
    },
    /// The field must be a string from a fixed set.
    OneOf {
        /// Field location.
        path: FieldPath,
        /// Accepted values, compared exactly.
        allowed: Vec<String>,
    },
    /// The field must equal a value fixed when the rule was built.
    Equals {
        /// Field location.
        path: FieldPath,
        /// Expected value.
        expected: Value,
    },
    /// A cross-field invariant.
    Custom {
        /// Must hold for the document to pass.
        holds: Predicate,
        /// Failure message.
        message: MessageFn,
    },
    /// A group of rules evaluated only when `when` holds.
    When {
        /// Guard.
        when: Predicate,
        /// Rules evaluated in order when the guard holds.
        rules: Vec<SchemaRule>,
    },
    /// Rules evaluated for every entry of the object or array at `path`.
    Each {
        /// Container location. Absent or scalar yields no rules.
        path: FieldPath,
        /// Rule generator for one entry.
        expand: Expand,
    },
}

impl SchemaRule {
    /// `Required(path, kind)`.
    pub fn required(path: FieldPath, kind: ValueKind) -> Self {
        Self::Required { path, kind }
    }

    /// `RequiredIf(path, kind, predicate)`.
    pub fn required_if<F>(path: FieldPath, kind: ValueKind, when: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::RequiredIf {
            path,
            kind,
            when: Arc::new(when),
        }
    }

    /// A field that may be omitted but must have `kind` when present.
    pub fn optional(path: FieldPath, kind: ValueKind) -> Self {
        let trigger = path.clone();
        Self::required_if(path, kind, move |doc| trigger.is_present(doc))
    }

    /// `OneOf(path, allowed)`.
    pub fn one_of(path: FieldPath, allowed: &[&str]) -> Self {
        Self::OneOf {
            path,
            allowed: allowed.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// `Equals(path, expected)`.
    pub fn equals(path: FieldPath, expected: impl Into<Value>) -> Self {
        Self::Equals {
            path,
            expected: expected.into(),
        }
    }

    /// `Custom(predicate, message)` with a fixed message.
    pub fn custom<F>(holds: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::Custom {
            holds: Arc::new(holds),
            message: Arc::new(move |_| message.clone()),
        }
    }

    /// `Custom(predicate, message)` where the message quotes the document.
    pub fn custom_described<F, M>(holds: F, message: M) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
        M: Fn(&Value) -> String + Send + Sync + 'static,
    {
        Self::Custom {
            holds: Arc::new(holds),
            message: Arc::new(message),
        }
    }

    /// Nested rules guarded by a predicate.
    pub fn when<F>(when: F, rules: Vec<SchemaRule>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::When {
            when: Arc::new(when),
            rules,
        }
    }

    /// Per-entry rules for the container at `path`.
    pub fn each(path: FieldPath, expand: Expand) -> Self {
        Self::Each { path, expand }
    }

    /// Evaluate against `document`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns a `Forbidden` [`Rejection`] naming the failing field or
    /// condition.
    pub fn check(&self, document: &Value) -> Result<(), Rejection> {
        match self {
            Self::Required { path, kind } => check_required(path, *kind, document),
            Self::RequiredIf { path, kind, when } => {
                if when(document) {
                    check_required(path, *kind, document)
                } else {
                    Ok(())
                }
            }
            Self::OneOf { path, allowed } => {
                let value = present(path, document)?;
                match value.as_str() {
                    Some(s) if allowed.iter().any(|a| a == s) => Ok(()),
                    _ => Err(Rejection::forbidden(format!(
                        "Field '{path}' is {} but must be one of: {}.",
                        render(value),
                        allowed.join(", ")
                    ))),
                }
            }
            Self::Equals { path, expected } => {
                let value = present(path, document)?;
                if value == expected {
                    Ok(())
                } else {
                    Err(Rejection::forbidden(format!(
                        "Field '{path}' should be {}.",
                        render(expected)
                    )))
                }
            }
            Self::Custom { holds, message } => {
                if holds(document) {
                    Ok(())
                } else {
                    Err(Rejection::forbidden(message(document)))
                }
            }
            Self::When { when, rules } => {
                if when(document) {
                    check_all(rules, document)
                } else {
                    Ok(())
                }
            }
            Self::Each { path, expand } => match path.resolve(document) {
                Some(Value::Object(map)) => {
                    for key in map.keys() {
                        let entry = path.clone().key(key.as_str());
                        check_all(&expand(&entry, key), document)?;
                    }
                    Ok(())
                }
                Some(Value::Array(items)) => {
                    for index in 0..items.len() {
                        let entry = path.clone().index(index);
                        check_all(&expand(&entry, &index.to_string()), document)?;
                    }
                    Ok(())
                }
                _ => Ok(()),
            },
        }
    }
}

/// Evaluate rules in order; the first failure wins.
///
/// # Errors
///
/// Returns the first rule's [`Rejection`].
pub fn check_all(rules: &[SchemaRule], document: &Value) -> Result<(), Rejection> {
    rules.iter().try_for_each(|rule| rule.check(document))
}

fn present<'a>(path: &FieldPath, document: &'a Value) -> Result<&'a Value, Rejection> {
    path.resolve(document)
        .ok_or_else(|| Rejection::forbidden(format!("Missing required field '{path}'.")))
}

fn check_required(path: &FieldPath, kind: ValueKind, document: &Value) -> Result<(), Rejection> {
    let value = present(path, document)?;
    let actual = ValueKind::of(value);
    if actual == kind {
        Ok(())
    } else {
        Err(Rejection::forbidden(format!(
            "Field '{path}' has type {actual} but must be {kind}."
        )))
    }
}

/// Quote strings, print everything else as JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

impl std::fmt::Debug for SchemaRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required { path, kind } => write!(f, "Required({path}, {kind})"),
            Self::RequiredIf { path, kind, .. } => write!(f, "RequiredIf({path}, {kind}, ..)"),
            Self::OneOf { path, allowed } => write!(f, "OneOf({path}, {allowed:?})"),
            Self::Equals { path, expected } => write!(f, "Equals({path}, {expected})"),
            Self::Custom { .. } => f.write_str("Custom(..)"),
            Self::When { rules, .. } => write!(f, "When(.., {} rules)", rules.len()),
            Self::Each { path, .. } => write!(f, "Each({path}, ..)"),
        }
    }
}
