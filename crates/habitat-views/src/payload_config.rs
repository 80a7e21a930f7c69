//! # Payload Configuration Lookup
//!
//! The parser needs the configuration that applies to a payload at a given
//! moment. Each flight contributes one row per payload keyed by
//! `(callsign, flight end)`; each sandbox contributes one row per payload
//! keyed by `(callsign, sandbox)`. Within a callsign, every timestamp sorts
//! before the sandbox marker.
//!
//! A lookup at time `t` returns the first row at or after `(callsign, t)`:
//! the flight whose window ends soonest without having ended, or the
//! sandbox configuration when no such flight exists. A lookup without a
//! time goes straight to the sandbox.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use habitat_core::DocumentKind;

/// Second component of a payload configuration key.
#[derive(Debug, Clone, Copy)]
pub enum ConfigEpoch {
    /// Configuration from a flight whose window ends at this unix time.
    Ends(f64),
    /// Configuration from a sandbox document.
    Sandbox,
}

impl Serialize for ConfigEpoch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ends(end) => serializer.serialize_f64(*end),
            Self::Sandbox => serializer.serialize_str("sandbox"),
        }
    }
}

impl Ord for ConfigEpoch {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Ends(a), Self::Ends(b)) => a.total_cmp(b),
            (Self::Ends(_), Self::Sandbox) => Ordering::Less,
            (Self::Sandbox, Self::Ends(_)) => Ordering::Greater,
            (Self::Sandbox, Self::Sandbox) => Ordering::Equal,
        }
    }
}

impl PartialOrd for ConfigEpoch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ConfigEpoch {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ConfigEpoch {}

/// One payload configuration row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadConfigRow {
    /// Payload callsign.
    pub callsign: String,
    /// Flight end time or sandbox marker.
    pub epoch: ConfigEpoch,
    /// `_id` of the contributing document, if it has one.
    pub document_id: Option<String>,
    /// The payload configuration itself.
    pub config: Value,
}

/// The `(callsign, epoch)` keys a document contributes.
///
/// Flights without a numeric `end`, documents of other kinds, and
/// documents without a `payloads` object contribute nothing.
pub fn config_keys(document: &Value) -> Vec<(String, ConfigEpoch)> {
    let epoch = match DocumentKind::of(document) {
        Some(DocumentKind::Flight) => match document.get("end").and_then(Value::as_f64) {
            Some(end) => ConfigEpoch::Ends(end),
            None => return Vec::new(),
        },
        Some(DocumentKind::Sandbox) => ConfigEpoch::Sandbox,
        _ => return Vec::new(),
    };
    document
        .get("payloads")
        .and_then(Value::as_object)
        .map(|payloads| payloads.keys().map(|k| (k.clone(), epoch)).collect())
        .unwrap_or_default()
}

/// Sorted in-memory payload configuration rows.
#[derive(Debug, Clone, Default)]
pub struct PayloadConfigIndex {
    rows: Vec<PayloadConfigRow>,
}

impl PayloadConfigIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over `documents`.
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut rows: Vec<PayloadConfigRow> = documents.into_iter().flat_map(rows_of).collect();
        rows.sort_by(key_order);
        Self { rows }
    }

    /// Add the rows a document contributes, keeping key order. Returns how
    /// many were added.
    pub fn insert(&mut self, document: &Value) -> usize {
        let new_rows = rows_of(document);
        let added = new_rows.len();
        for row in new_rows {
            let at = self
                .rows
                .partition_point(|existing| key_order(existing, &row) != Ordering::Greater);
            self.rows.insert(at, row);
        }
        added
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the index has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in key order.
    pub fn rows(&self) -> &[PayloadConfigRow] {
        &self.rows
    }

    /// The configuration in force for `callsign` at `at`, or the sandbox
    /// configuration when `at` is `None` or no flight window is still open.
    pub fn lookup(&self, callsign: &str, at: Option<f64>) -> Option<&PayloadConfigRow> {
        let start = at.map_or(ConfigEpoch::Sandbox, ConfigEpoch::Ends);
        let found = self
            .rows
            .iter()
            .find(|row| row.callsign == callsign && row.epoch >= start);
        if found.is_none() {
            tracing::debug!(callsign, ?at, "no payload configuration found");
        }
        found
    }
}

fn key_order(a: &PayloadConfigRow, b: &PayloadConfigRow) -> Ordering {
    a.callsign.cmp(&b.callsign).then(a.epoch.cmp(&b.epoch))
}

fn rows_of(document: &Value) -> Vec<PayloadConfigRow> {
    let document_id = document
        .get("_id")
        .and_then(Value::as_str)
        .map(str::to_string);
    config_keys(document)
        .into_iter()
        .map(|(callsign, epoch)| PayloadConfigRow {
            config: document["payloads"][callsign.as_str()].clone(),
            callsign,
            epoch,
            document_id: document_id.clone(),
        })
        .collect()
}
