//! # habitat-schema: Declarative Document Rules
//!
//! Per-kind ordered rule lists evaluated fail-fast against loosely-typed
//! JSON documents.
//!
//! ## Rules (`rule`)
//!
//! [`SchemaRule`] is the closed set of checks: `Required`, `RequiredIf`,
//! `OneOf`, `Equals`, `Custom`, plus `When` and `Each` for conditional
//! groups and per-entry expansion over payloads, sentence fields, filters
//! and chasers.
//!
//! ## Schemas
//!
//! - [`flight_schema`]: launch window, launch block, payloads, editors.
//! - [`payload_rules`]: one payload configuration (radio, telemetry,
//!   sentence, filters, chasers).
//! - [`listener_info_schema`] / [`listener_telemetry_schema`].
//! - [`sandbox_schema`]: payload configurations outside any flight.
//! - [`payload_telemetry_schema`]: `data` plus timestamped `receivers`.
//!
//! [`SchemaRegistry`] holds one prebuilt [`Schema`] per document kind.
//!
//! ## Crate Policy
//!
//! - Depends only on `habitat-core` internally.
//! - A schema never mutates or normalizes the document it checks.
//! - Field names in rules are the wire contract with existing submitters
//!   and must not be renamed.

pub mod flight;
pub mod listener;
pub mod payload;
pub mod registry;
pub mod rule;
pub mod schema;
pub mod telemetry;

pub use flight::flight_schema;
pub use listener::{listener_info_schema, listener_telemetry_schema};
pub use payload::{payload_rules, CHECKSUMS, COORDINATE_SENSOR, FILTER_TYPES, UKHAS_PROTOCOL};
pub use registry::{sandbox_schema, schema_for, SchemaRegistry};
pub use rule::{check_all, SchemaRule};
pub use schema::Schema;
pub use telemetry::{payload_telemetry_schema, RECEIVERS_FIELD};
