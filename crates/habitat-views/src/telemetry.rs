//! # Telemetry Export Rows
//!
//! Parsed `payload_telemetry` documents are exported per flight and payload,
//! ordered by their consensus receive time. A document contributes a row
//! only when it has a `data` object whose `_parsed` marker is set and a
//! `receivers` object with at least one usable receive time.

use serde::Serialize;
use serde_json::Value;

use habitat_core::DocumentKind;

use crate::consensus::{estimate, ReceiverReports};

/// One export row: `(flight, payload, estimated time)` with the raw
/// sentence as value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRow {
    /// `data._flight`, the flight the parser matched the sentence to.
    pub flight: Option<String>,
    /// `data.payload`, the payload callsign.
    pub payload: Option<String>,
    /// Consensus receive time over all receivers.
    pub estimated_received_time: f64,
    /// `data._sentence`, if present.
    pub sentence: Option<String>,
}

/// Loose truthiness: absent, `null`, `false`, `0` and `""` are unset.
fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

fn string_field(data: &Value, field: &str) -> Option<String> {
    data.get(field).and_then(Value::as_str).map(str::to_string)
}

/// The export row for one document, or `None` if it does not qualify.
pub fn telemetry_row(document: &Value) -> Option<TelemetryRow> {
    if DocumentKind::of(document) != Some(DocumentKind::PayloadTelemetry) {
        return None;
    }
    let data = document.get("data")?;
    if !is_set(Some(data)) || !is_set(data.get("_parsed")) {
        return None;
    }
    let reports = match ReceiverReports::from_telemetry(document) {
        Ok(reports) => reports,
        Err(e) => {
            tracing::debug!(error = %e, "skipping telemetry document");
            return None;
        }
    };
    let estimated_received_time = match estimate(&reports) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(error = %e, "skipping telemetry document");
            return None;
        }
    };
    Some(TelemetryRow {
        flight: string_field(data, "_flight"),
        payload: string_field(data, "payload"),
        estimated_received_time,
        sentence: string_field(data, "_sentence").filter(|s| !s.is_empty()),
    })
}

/// Export rows sorted by flight, payload, then estimated time.
#[derive(Debug, Clone, Default)]
pub struct TelemetryIndex {
    rows: Vec<TelemetryRow>,
}

impl TelemetryIndex {
    /// Build the index from a document set, skipping documents that do not
    /// qualify.
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut rows: Vec<TelemetryRow> = documents.into_iter().filter_map(telemetry_row).collect();
        rows.sort_by(|a, b| {
            a.flight
                .cmp(&b.flight)
                .then_with(|| a.payload.cmp(&b.payload))
                .then_with(|| a.estimated_received_time.total_cmp(&b.estimated_received_time))
        });
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the index has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one flight and payload, in receive-time order.
    pub fn rows_for<'a>(
        &'a self,
        flight: &'a str,
        payload: &'a str,
    ) -> impl Iterator<Item = &'a TelemetryRow> + 'a {
        self.rows.iter().filter(move |row| {
            row.flight.as_deref() == Some(flight) && row.payload.as_deref() == Some(payload)
        })
    }
}
