//! # Flight Schema
//!
//! Rules for `flight` documents, in evaluation order:
//!
//! 1. `start` / `end` numbers, then the launch window checks (start before
//!    end, at least 14 days, not before 2000, not after 3000).
//! 2. `name`, the `launch` block, and launch-time containment.
//! 3. `payloads` object, each entry checked by
//!    [`payload_rules`](crate::payload::payload_rules).
//! 4. Optional `editors` list of identity strings.

use serde_json::Value;

use habitat_core::{
    describe_epoch, DocumentKind, FieldPath, ValueKind, LAUNCH_WINDOW_MIN_SECS, YEAR_2000_EPOCH,
    YEAR_3000_EPOCH,
};

use crate::payload::payload_rules;
use crate::rule::SchemaRule;
use crate::schema::Schema;

fn field(dotted: &str) -> FieldPath {
    FieldPath::from_keys(dotted)
}

fn number(document: &Value, dotted: &str) -> Option<f64> {
    field(dotted).resolve_f64(document)
}

fn window(document: &Value) -> Option<(f64, f64)> {
    Some((number(document, "start")?, number(document, "end")?))
}

#[allow(clippy::cast_precision_loss)]
fn launch_window_rules() -> Vec<SchemaRule> {
    vec![
        SchemaRule::custom(
            |d| window(d).is_some_and(|(start, end)| start < end),
            "Launch window must start before it ends.",
        ),
        SchemaRule::custom(
            |d| window(d).is_some_and(|(start, end)| end - start >= LAUNCH_WINDOW_MIN_SECS as f64),
            "Launch window must be at least 14 days long.",
        ),
        SchemaRule::custom_described(
            |d| number(d, "start").is_some_and(|start| start >= YEAR_2000_EPOCH as f64),
            |d| {
                format!(
                    "Start date {} is before the year 2000.",
                    describe_epoch(number(d, "start").unwrap_or(f64::NAN))
                )
            },
        ),
        SchemaRule::custom_described(
            |d| number(d, "end").is_some_and(|end| end <= YEAR_3000_EPOCH as f64),
            |d| {
                format!(
                    "End date {} is after the year 3000.",
                    describe_epoch(number(d, "end").unwrap_or(f64::NAN))
                )
            },
        ),
    ]
}

fn launch_contained(document: &Value) -> bool {
    match (window(document), number(document, "launch.time")) {
        (Some((start, end)), Some(time)) => start <= time && time <= end,
        _ => false,
    }
}

fn editor_rules(entry: &FieldPath, _index: &str) -> Vec<SchemaRule> {
    vec![SchemaRule::required(entry.clone(), ValueKind::String)]
}

/// The flight rule set.
pub fn flight_schema() -> Schema {
    let mut rules = vec![
        SchemaRule::required(field("start"), ValueKind::Number),
        SchemaRule::required(field("end"), ValueKind::Number),
    ];
    rules.extend(launch_window_rules());
    rules.extend([
        SchemaRule::required(field("name"), ValueKind::String),
        SchemaRule::required(field("launch"), ValueKind::Object),
        SchemaRule::required(field("launch.time"), ValueKind::Number),
        SchemaRule::required(field("launch.timezone"), ValueKind::String),
        SchemaRule::required(field("launch.location"), ValueKind::Object),
        SchemaRule::required(field("launch.location.latitude"), ValueKind::Number),
        SchemaRule::required(field("launch.location.longitude"), ValueKind::Number),
        SchemaRule::custom(launch_contained, "Launch time is not inside the launch window."),
        SchemaRule::required(field("payloads"), ValueKind::Object),
        SchemaRule::each(field("payloads"), payload_rules),
        SchemaRule::optional(field("editors"), ValueKind::Array),
        SchemaRule::each(field("editors"), editor_rules),
    ]);
    Schema::new(DocumentKind::Flight, rules)
}
