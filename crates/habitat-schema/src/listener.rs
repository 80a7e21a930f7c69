//! # Listener Schemas
//!
//! `listener_info` and `listener_telemetry` documents share a header:
//! creation and upload timestamps (created strictly before uploaded) and a
//! `data` object naming the listener's callsign. Telemetry reports also
//! carry a position and a time of day.

use habitat_core::{DocumentKind, FieldPath, ValueKind};

use crate::rule::SchemaRule;
use crate::schema::Schema;

fn field(dotted: &str) -> FieldPath {
    FieldPath::from_keys(dotted)
}

fn header_rules() -> Vec<SchemaRule> {
    let created = field("time_created");
    let uploaded = field("time_uploaded");
    vec![
        SchemaRule::required(created.clone(), ValueKind::Number),
        SchemaRule::required(uploaded.clone(), ValueKind::Number),
        SchemaRule::custom(
            move |d| match (created.resolve_f64(d), uploaded.resolve_f64(d)) {
                (Some(c), Some(u)) => c < u,
                _ => false,
            },
            "Document cannot be created after it was uploaded.",
        ),
        SchemaRule::required(field("data"), ValueKind::Object),
        SchemaRule::required(field("data.callsign"), ValueKind::String),
    ]
}

/// Rules for `listener_info` documents.
pub fn listener_info_schema() -> Schema {
    Schema::new(DocumentKind::ListenerInfo, header_rules())
}

/// Rules for `listener_telemetry` documents.
pub fn listener_telemetry_schema() -> Schema {
    let mut rules = header_rules();
    rules.extend([
        SchemaRule::required(field("data.latitude"), ValueKind::Number),
        SchemaRule::required(field("data.longitude"), ValueKind::Number),
        SchemaRule::required(field("data.time"), ValueKind::Object),
        SchemaRule::required(field("data.time.hour"), ValueKind::Number),
        SchemaRule::required(field("data.time.minute"), ValueKind::Number),
        SchemaRule::required(field("data.time.second"), ValueKind::Number),
    ]);
    Schema::new(DocumentKind::ListenerTelemetry, rules)
}
