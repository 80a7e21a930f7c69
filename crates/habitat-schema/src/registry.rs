//! # Schema Registry
//!
//! Builds one [`Schema`] per [`DocumentKind`] at construction and hands
//! them out by kind. The registry is immutable after construction and is
//! `Send + Sync`, so a single instance can serve any number of concurrent
//! validations.

use habitat_core::{DocumentKind, FieldPath, ValueKind};

use crate::flight::flight_schema;
use crate::listener::{listener_info_schema, listener_telemetry_schema};
use crate::payload::payload_rules;
use crate::rule::SchemaRule;
use crate::schema::Schema;
use crate::telemetry::payload_telemetry_schema;

/// Rules for `sandbox` documents: a `payloads` object whose entries follow
/// the same payload-configuration rules as a flight.
pub fn sandbox_schema() -> Schema {
    let payloads = FieldPath::from_keys("payloads");
    Schema::new(
        DocumentKind::Sandbox,
        vec![
            SchemaRule::required(payloads.clone(), ValueKind::Object),
            SchemaRule::each(payloads, payload_rules),
        ],
    )
}

/// The schema governing documents of `kind`.
pub fn schema_for(kind: DocumentKind) -> Schema {
    match kind {
        DocumentKind::Flight => flight_schema(),
        DocumentKind::ListenerInfo => listener_info_schema(),
        DocumentKind::ListenerTelemetry => listener_telemetry_schema(),
        DocumentKind::PayloadTelemetry => payload_telemetry_schema(),
        DocumentKind::Sandbox => sandbox_schema(),
        DocumentKind::Config => Schema::empty(kind),
    }
}

/// Prebuilt schemas for every document kind.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    flight: Schema,
    listener_info: Schema,
    listener_telemetry: Schema,
    payload_telemetry: Schema,
    config: Schema,
    sandbox: Schema,
}

impl SchemaRegistry {
    /// Build the schema for every kind.
    pub fn new() -> Self {
        Self {
            flight: schema_for(DocumentKind::Flight),
            listener_info: schema_for(DocumentKind::ListenerInfo),
            listener_telemetry: schema_for(DocumentKind::ListenerTelemetry),
            payload_telemetry: schema_for(DocumentKind::PayloadTelemetry),
            config: schema_for(DocumentKind::Config),
            sandbox: schema_for(DocumentKind::Sandbox),
        }
    }

    /// The schema for `kind`.
    pub fn get(&self, kind: DocumentKind) -> &Schema {
        match kind {
            DocumentKind::Flight => &self.flight,
            DocumentKind::ListenerInfo => &self.listener_info,
            DocumentKind::ListenerTelemetry => &self.listener_telemetry,
            DocumentKind::PayloadTelemetry => &self.payload_telemetry,
            DocumentKind::Config => &self.config,
            DocumentKind::Sandbox => &self.sandbox,
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
