//! # Payload Configuration Rules
//!
//! Rules for one entry of a flight's (or sandbox's) `payloads` object,
//! generated per callsign. Two blocks are conditional:
//!
//! - RTTY parameters, when `telemetry.modulation` is `rtty` in any case.
//! - UKHAS sentence parameters, when `sentence.protocol` is exactly `UKHAS`.
//!
//! Modulation names are compared case-insensitively; protocol and checksum
//! names are compared exactly.

use serde_json::Value;

use habitat_core::{FieldPath, ValueKind};

use crate::rule::SchemaRule;

/// Checksum algorithms a UKHAS sentence may declare.
pub const CHECKSUMS: &[&str] = &["crc16-ccitt", "xor", "fletcher-16", "fletcher-16-256", "none"];

/// Filter entry types.
pub const FILTER_TYPES: &[&str] = &["normal", "hotfix"];

/// Filter lists under `filters`, in evaluation order.
pub const FILTER_STAGES: &[&str] = &["intermediate", "post"];

/// Sensor whose field descriptors must also declare a `format`.
pub const COORDINATE_SENSOR: &str = "stdtelem.coordinate";

/// The UKHAS protocol tag.
pub const UKHAS_PROTOCOL: &str = "UKHAS";

fn at(base: &FieldPath, suffix: &str) -> FieldPath {
    base.clone().join(suffix)
}

/// A predicate: the string at `path` satisfies `test`.
fn string_at<F>(path: FieldPath, test: F) -> impl Fn(&Value) -> bool + Send + Sync + 'static
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    move |doc| path.resolve_str(doc).is_some_and(&test)
}

/// Rules for the payload configuration at `base`, keyed by `callsign`.
pub fn payload_rules(base: &FieldPath, callsign: &str) -> Vec<SchemaRule> {
    let mut rules = vec![
        SchemaRule::required(at(base, "radio"), ValueKind::Object),
        SchemaRule::required(at(base, "radio.frequency"), ValueKind::Number),
        SchemaRule::required(at(base, "radio.mode"), ValueKind::String),
        SchemaRule::required(at(base, "telemetry"), ValueKind::Object),
        SchemaRule::required(at(base, "telemetry.modulation"), ValueKind::String),
    ];
    rules.extend(rtty_rules(base));
    rules.extend([
        SchemaRule::required(at(base, "sentence"), ValueKind::Object),
        SchemaRule::required(at(base, "sentence.protocol"), ValueKind::String),
        SchemaRule::when(
            string_at(at(base, "sentence.protocol"), |p| p == UKHAS_PROTOCOL),
            ukhas_rules(base, callsign),
        ),
    ]);
    rules.extend(filter_rules(base));
    rules.extend([
        SchemaRule::optional(at(base, "chasers"), ValueKind::Array),
        SchemaRule::each(at(base, "chasers"), chaser_rules),
    ]);
    rules
}

fn rtty_rules(base: &FieldPath) -> Vec<SchemaRule> {
    let modulation = at(base, "telemetry.modulation");
    [
        ("telemetry.shift", ValueKind::Number),
        ("telemetry.encoding", ValueKind::String),
        ("telemetry.baud", ValueKind::Number),
        ("telemetry.parity", ValueKind::String),
        ("telemetry.stops", ValueKind::Number),
    ]
    .into_iter()
    .map(|(suffix, kind)| {
        SchemaRule::required_if(
            at(base, suffix),
            kind,
            string_at(modulation.clone(), |m| m.eq_ignore_ascii_case("rtty")),
        )
    })
    .collect()
}

fn ukhas_rules(base: &FieldPath, callsign: &str) -> Vec<SchemaRule> {
    vec![
        SchemaRule::required(at(base, "sentence.checksum"), ValueKind::String),
        SchemaRule::one_of(at(base, "sentence.checksum"), CHECKSUMS),
        SchemaRule::required(at(base, "sentence.payload"), ValueKind::String),
        SchemaRule::equals(at(base, "sentence.payload"), callsign),
        SchemaRule::required(at(base, "sentence.fields"), ValueKind::Array),
        SchemaRule::each(at(base, "sentence.fields"), sentence_field_rules),
    ]
}

fn sentence_field_rules(entry: &FieldPath, _index: &str) -> Vec<SchemaRule> {
    vec![
        SchemaRule::required(at(entry, "name"), ValueKind::String),
        SchemaRule::required(at(entry, "sensor"), ValueKind::String),
        SchemaRule::required_if(
            at(entry, "format"),
            ValueKind::String,
            string_at(at(entry, "sensor"), |s| s == COORDINATE_SENSOR),
        ),
    ]
}

fn filter_rules(base: &FieldPath) -> Vec<SchemaRule> {
    let mut rules = vec![SchemaRule::optional(at(base, "filters"), ValueKind::Object)];
    for stage in FILTER_STAGES {
        let list = at(base, "filters").key(*stage);
        rules.push(SchemaRule::optional(list.clone(), ValueKind::Array));
        rules.push(SchemaRule::each(list, filter_entry_rules));
    }
    rules
}

fn filter_entry_rules(entry: &FieldPath, _index: &str) -> Vec<SchemaRule> {
    let filter_type = at(entry, "type");
    let is_normal = string_at(filter_type.clone(), |t| t == "normal");
    let is_hotfix = |path: &FieldPath| string_at(path.clone(), |t| t == "hotfix");
    let config = at(entry, "config");
    let config_present = config.clone();
    vec![
        SchemaRule::required(filter_type.clone(), ValueKind::String),
        SchemaRule::one_of(filter_type.clone(), FILTER_TYPES),
        SchemaRule::required_if(at(entry, "callable"), ValueKind::String, is_normal),
        SchemaRule::required_if(config, ValueKind::Object, {
            let is_normal = string_at(filter_type.clone(), |t| t == "normal");
            move |doc| is_normal(doc) && config_present.is_present(doc)
        }),
        SchemaRule::required_if(at(entry, "code"), ValueKind::String, is_hotfix(&filter_type)),
        SchemaRule::required_if(at(entry, "signature"), ValueKind::String, is_hotfix(&filter_type)),
        SchemaRule::required_if(at(entry, "certificate"), ValueKind::String, is_hotfix(&filter_type)),
    ]
}

fn chaser_rules(entry: &FieldPath, _index: &str) -> Vec<SchemaRule> {
    vec![SchemaRule::required(entry.clone(), ValueKind::String)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::check_all;
    use serde_json::json;

    fn base() -> FieldPath {
        FieldPath::root().key("payloads").key("HABX")
    }

    fn wrap(config: Value) -> Value {
        json!({"payloads": {"HABX": config}})
    }

    fn ukhas_payload() -> Value {
        json!({
            "radio": {"frequency": 434.075, "mode": "USB"},
            "telemetry": {
                "modulation": "RTTY",
                "shift": 425,
                "encoding": "ASCII-8",
                "baud": 50,
                "parity": "none",
                "stops": 2
            },
            "sentence": {
                "protocol": "UKHAS",
                "checksum": "crc16-ccitt",
                "payload": "HABX",
                "fields": [
                    {"name": "sentence_id", "sensor": "base.ascii_int"},
                    {"name": "latitude", "sensor": "stdtelem.coordinate", "format": "dd.dddd"}
                ]
            }
        })
    }

    fn check(config: Value) -> Result<(), String> {
        check_all(&payload_rules(&base(), "HABX"), &wrap(config)).map_err(|r| r.message)
    }

    #[test]
    fn test_full_ukhas_payload_passes() {
        assert_eq!(check(ukhas_payload()), Ok(()));
    }

    #[test]
    fn test_rtty_fields_case_insensitive_trigger() {
        let mut cfg = ukhas_payload();
        cfg["telemetry"] = json!({"modulation": "rTtY"});
        assert_eq!(
            check(cfg),
            Err("Missing required field 'payloads.HABX.telemetry.shift'.".to_string())
        );
    }

    #[test]
    fn test_non_rtty_modulation_needs_no_rtty_fields() {
        let mut cfg = ukhas_payload();
        cfg["telemetry"] = json!({"modulation": "DominoEX"});
        assert_eq!(check(cfg), Ok(()));
    }

    #[test]
    fn test_protocol_is_case_sensitive() {
        let mut cfg = ukhas_payload();
        cfg["sentence"] = json!({"protocol": "ukhas"});
        assert_eq!(check(cfg), Ok(()));
    }

    #[test]
    fn test_bad_checksum() {
        let mut cfg = ukhas_payload();
        cfg["sentence"]["checksum"] = json!("CRC16-CCITT");
        let msg = check(cfg).unwrap_err();
        assert!(msg.starts_with("Field 'payloads.HABX.sentence.checksum' is 'CRC16-CCITT'"));
        assert!(msg.contains("crc16-ccitt, xor, fletcher-16, fletcher-16-256, none"));
    }

    #[test]
    fn test_every_checksum_accepted() {
        for checksum in CHECKSUMS {
            let mut cfg = ukhas_payload();
            cfg["sentence"]["checksum"] = json!(checksum);
            assert_eq!(check(cfg), Ok(()), "checksum {checksum}");
        }
    }

    #[test]
    fn test_sentence_payload_must_match_callsign() {
        let mut cfg = ukhas_payload();
        cfg["sentence"]["payload"] = json!("habx");
        assert_eq!(
            check(cfg),
            Err("Field 'payloads.HABX.sentence.payload' should be 'HABX'.".to_string())
        );
    }

    #[test]
    fn test_coordinate_field_requires_format() {
        let mut cfg = ukhas_payload();
        cfg["sentence"]["fields"][1]
            .as_object_mut()
            .unwrap()
            .remove("format");
        assert_eq!(
            check(cfg),
            Err("Missing required field 'payloads.HABX.sentence.fields.1.format'.".to_string())
        );
    }

    #[test]
    fn test_fields_must_be_array() {
        let mut cfg = ukhas_payload();
        cfg["sentence"]["fields"] = json!({"0": {"name": "a", "sensor": "b"}});
        assert_eq!(
            check(cfg),
            Err("Field 'payloads.HABX.sentence.fields' has type object but must be array.".to_string())
        );
    }

    #[test]
    fn test_normal_and_hotfix_filters() {
        let mut cfg = ukhas_payload();
        cfg["filters"] = json!({
            "intermediate": [{"type": "normal", "callable": "common.invalid_gps", "config": {}}],
            "post": [{"type": "hotfix", "code": "x", "signature": "s", "certificate": "c"}]
        });
        assert_eq!(check(cfg), Ok(()));
    }

    #[test]
    fn test_normal_filter_needs_callable() {
        let mut cfg = ukhas_payload();
        cfg["filters"] = json!({"post": [{"type": "normal"}]});
        assert_eq!(
            check(cfg),
            Err("Missing required field 'payloads.HABX.filters.post.0.callable'.".to_string())
        );
    }

    #[test]
    fn test_normal_filter_config_must_be_object() {
        let mut cfg = ukhas_payload();
        cfg["filters"] = json!({"post": [{"type": "normal", "callable": "f", "config": "x"}]});
        assert!(check(cfg).unwrap_err().contains("filters.post.0.config"));
    }

    #[test]
    fn test_hotfix_filter_needs_certificate() {
        let mut cfg = ukhas_payload();
        cfg["filters"] = json!({"intermediate": [{"type": "hotfix", "code": "x", "signature": "s"}]});
        assert_eq!(
            check(cfg),
            Err("Missing required field 'payloads.HABX.filters.intermediate.0.certificate'.".to_string())
        );
    }

    #[test]
    fn test_unknown_filter_type_rejected() {
        let mut cfg = ukhas_payload();
        cfg["filters"] = json!({"post": [{"type": "magic", "callable": "f"}]});
        assert!(check(cfg)
            .unwrap_err()
            .starts_with("Field 'payloads.HABX.filters.post.0.type' is 'magic'"));
    }

    #[test]
    fn test_filter_list_must_be_array() {
        let mut cfg = ukhas_payload();
        cfg["filters"] = json!({"post": {"type": "normal"}});
        assert_eq!(
            check(cfg),
            Err("Field 'payloads.HABX.filters.post' has type object but must be array.".to_string())
        );
    }

    #[test]
    fn test_chasers_must_be_strings() {
        let mut cfg = ukhas_payload();
        cfg["chasers"] = json!(["M0ABC", 4]);
        assert_eq!(
            check(cfg),
            Err("Field 'payloads.HABX.chasers.1' has type number but must be string.".to_string())
        );
    }

    #[test]
    fn test_radio_required_first() {
        assert_eq!(
            check(json!({})),
            Err("Missing required field 'payloads.HABX.radio'.".to_string())
        );
    }
}
