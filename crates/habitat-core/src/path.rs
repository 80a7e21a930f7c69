//! # Field Paths
//!
//! A [`FieldPath`] is an ordered sequence of key and index segments that
//! locates a value inside a nested document. Resolution walks the document
//! one segment at a time and yields `None` as soon as any container along
//! the way is missing or has the wrong shape.
//!
//! Paths built from document keys (payload callsigns, filter positions) use
//! the builder methods so that keys containing dots stay a single segment.
//! [`FieldPath::parse`] is for paths written in source or on the command
//! line.

use serde_json::Value;

use crate::error::PathError;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member lookup.
    Key(String),
    /// Absolute offset into an array.
    Index(usize),
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A typed path into a nested document, rendered as `a.b.0.c`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, which resolves to the document itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// A path of plain keys from dotted text, e.g. `"launch.location"`.
    ///
    /// Unlike [`FieldPath::parse`], every part is a key and empty parts are
    /// skipped, so this never fails. Used for paths written in source.
    pub fn from_keys(dotted: &str) -> Self {
        Self::root().join(dotted)
    }

    /// Parse a dot-separated path. All-digit segments become indices.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] for empty text or an empty segment.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        for (position, part) in text.split('.').enumerate() {
            if part.is_empty() {
                return Err(PathError::EmptySegment {
                    path: text.to_string(),
                    position,
                });
            }
            let segment = if part.bytes().all(|b| b.is_ascii_digit()) {
                match part.parse::<usize>() {
                    Ok(i) => Segment::Index(i),
                    Err(_) => Segment::Key(part.to_string()),
                }
            } else {
                Segment::Key(part.to_string())
            };
            segments.push(segment);
        }
        Ok(Self { segments })
    }

    /// Extend with an object key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Extend with an array index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Extend with a dotted suffix of plain keys, e.g. `"radio.frequency"`.
    ///
    /// Empty parts are skipped.
    #[must_use]
    pub fn join(mut self, suffix: &str) -> Self {
        for part in suffix.split('.').filter(|p| !p.is_empty()) {
            self.segments.push(Segment::Key(part.to_string()));
        }
        self
    }

    /// The segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Locate the value at this path, or `None` if it or any ancestor is
    /// absent.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |inside, segment| step(inside, segment))
    }

    /// Whether a value exists at this path.
    pub fn is_present(&self, document: &Value) -> bool {
        self.resolve(document).is_some()
    }

    /// The string at this path, if present and a string.
    pub fn resolve_str<'a>(&self, document: &'a Value) -> Option<&'a str> {
        self.resolve(document).and_then(Value::as_str)
    }

    /// The number at this path as `f64`, if present and numeric.
    pub fn resolve_f64(&self, document: &Value) -> Option<f64> {
        self.resolve(document).and_then(Value::as_f64)
    }
}

fn step<'a>(inside: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (inside, segment) {
        (Value::Object(map), Segment::Key(k)) => map.get(k),
        (Value::Object(map), Segment::Index(i)) => map.get(&i.to_string()),
        (Value::Array(items), Segment::Index(i)) => items.get(*i),
        (Value::Array(_), Segment::Key(_))
        | (Value::Null, _)
        | (Value::Bool(_), _)
        | (Value::Number(_), _)
        | (Value::String(_), _) => None,
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
