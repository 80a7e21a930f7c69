//! # Payload Telemetry Schema
//!
//! A `payload_telemetry` document holds one received sentence: a `data`
//! object (raw sentence, later the parser's fields) and a `receivers`
//! object keyed by listener callsign. Every receiver entry must carry a
//! numeric `time_created`, which the consensus receive-time estimate reads.

use serde_json::Value;

use habitat_core::{DocumentKind, FieldPath, ValueKind};

use crate::rule::SchemaRule;
use crate::schema::Schema;

/// Top-level field holding receiver reports.
pub const RECEIVERS_FIELD: &str = "receivers";

fn receiver_rules(entry: &FieldPath, _callsign: &str) -> Vec<SchemaRule> {
    vec![
        SchemaRule::required(entry.clone(), ValueKind::Object),
        SchemaRule::required(entry.clone().key("time_created"), ValueKind::Number),
    ]
}

fn has_receivers(document: &Value) -> bool {
    document
        .get(RECEIVERS_FIELD)
        .and_then(Value::as_object)
        .is_some_and(|receivers| !receivers.is_empty())
}

/// The `payload_telemetry` rule set.
pub fn payload_telemetry_schema() -> Schema {
    let receivers = FieldPath::from_keys(RECEIVERS_FIELD);
    Schema::new(
        DocumentKind::PayloadTelemetry,
        vec![
            SchemaRule::required(FieldPath::from_keys("data"), ValueKind::Object),
            SchemaRule::required(receivers.clone(), ValueKind::Object),
            SchemaRule::custom(has_receivers, "Telemetry must have at least one receiver."),
            SchemaRule::each(receivers, receiver_rules),
        ],
    )
}
