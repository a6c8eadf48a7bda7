use pretty_assertions::assert_eq;
use serde_json::json;
use stix_core::{EngineConfig, ErrorKind, ParseOptions};
use stix_test_utils::{fresh_registry, registry_with, INDICATOR_ID};

const WIDGET_ID: &str = "x-custom-widget--4527e5de-8572-446a-a57a-706f15467461";

#[test]
fn test_parse_unregistered_type_is_kept_verbatim() {
    let registry = fresh_registry();
    let widget = registry
        .parse(
            json!({
                "size": 3,
                "id": WIDGET_ID,
                "type": "x-custom-widget",
                "colour": "red",
                "spec_version": "2.1",
            }),
            None,
        )
        .unwrap();

    assert!(!widget.is_registered());
    assert_eq!(widget.object_type(), "x-custom-widget");
    assert_eq!(
        widget.to_canonical_json(),
        r#"{"type":"x-custom-widget","spec_version":"2.1","id":"x-custom-widget--4527e5de-8572-446a-a57a-706f15467461","size":3,"colour":"red"}"#
    );

    let reparsed = registry.parse(widget.to_canonical_json().as_str(), None).unwrap();
    assert_eq!(reparsed, widget);
}

#[test]
fn test_parse_unregistered_type_checks_id_prefix() {
    let registry = fresh_registry();
    let err = registry
        .parse(json!({"type": "x-custom-widget", "id": INDICATOR_ID}), None)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedId);
}

#[test]
fn test_construct_unregistered_type_fails() {
    let registry = fresh_registry();
    let err = registry
        .construct("x-custom-widget", None, stix_test_utils::inputs(json!({"size": 3})))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownType);
}

#[test]
fn test_parse_defaults_spec_version() {
    let registry = fresh_registry();
    let indicator = registry
        .parse(
            json!({
                "type": "indicator",
                "pattern_type": "stix",
                "pattern": "[file:name = 'evil.exe']",
                "valid_from": "2017-01-01T12:34:56Z",
            }),
            None,
        )
        .unwrap();

    assert_eq!(indicator.spec_version(), "2.1");
    assert_eq!(indicator.get_str("spec_version"), Some("2.1"));
}

#[test]
fn test_parse_configured_default_version() {
    let registry = registry_with(EngineConfig::default().with_default_spec_version("2.0"));
    let indicator = registry
        .parse(
            json!({
                "type": "indicator",
                "created": "2017-01-01T12:34:56.000Z",
                "modified": "2017-01-01T12:34:56.000Z",
                "labels": ["malicious-activity"],
                "pattern": "[file:name = 'evil.exe']",
                "valid_from": "2017-01-01T12:34:56Z",
            }),
            None,
        )
        .unwrap();

    assert_eq!(indicator.spec_version(), "2.0");
    assert!(!indicator.contains("spec_version"));
}

#[test]
fn test_parse_detects_20_from_identified_object() {
    let registry = fresh_registry();
    let indicator = registry
        .parse(
            json!({
                "type": "indicator",
                "id": INDICATOR_ID,
                "created": "2017-01-01T12:34:56.000Z",
                "modified": "2017-01-01T12:34:56.000Z",
                "labels": ["malicious-activity"],
                "pattern": "[file:name = 'evil.exe']",
                "valid_from": "2017-01-01T12:34:56Z",
            }),
            None,
        )
        .unwrap();

    assert_eq!(indicator.spec_version(), "2.0");
    assert!(!indicator.contains("spec_version"));
}

#[test]
fn test_parse_keeps_default_for_21_only_types() {
    let registry = fresh_registry();
    let grouping = registry
        .parse(
            json!({
                "type": "grouping",
                "id": "grouping--84e4d88f-44ea-4bcd-bbf3-b2c1c320bcb3",
                "context": "suspicious-activity",
                "object_refs": [INDICATOR_ID],
            }),
            None,
        )
        .unwrap();

    assert_eq!(grouping.spec_version(), "2.1");
}

#[test]
fn test_object_spec_version_wins_over_caller() {
    let registry = fresh_registry();
    let err = registry
        .parse(
            json!({
                "type": "indicator",
                "spec_version": "2.1",
                "labels": ["malicious-activity"],
                "pattern": "[file:name = 'evil.exe']",
            }),
            Some("2.0"),
        )
        .unwrap_err();

    // validated against 2.1, which requires pattern_type
    assert_eq!(err.kind(), ErrorKind::MissingProperties);
}

#[test]
fn test_parse_rejects_unsupported_version() {
    let registry = fresh_registry();
    let err = registry
        .parse(json!({"type": "indicator", "spec_version": "2.2"}), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);

    let err = registry
        .parse(json!({"type": "indicator"}), Some("1.0"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
}

#[test]
fn test_parse_rejects_bad_input() {
    let registry = fresh_registry();

    let err = registry.parse("{not json", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidJson);

    let err = registry.parse("[1, 2]", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidJson);

    let err = registry.parse(json!({"name": "nameless"}), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingType);

    let err = registry.parse(json!({"type": 7}), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingType);

    let err = registry
        .parse(json!({"type": "indicator", "spec_version": 2.1}), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(err.prop_name(), Some("spec_version"));
}

#[test]
fn test_parse_extra_properties() {
    let registry = fresh_registry();
    let raw = json!({
        "type": "identity",
        "spec_version": "2.1",
        "id": "identity--311b2d2d-f010-4473-83ec-1edf84858f4c",
        "created": "2015-12-21T19:59:11Z",
        "modified": "2015-12-21T19:59:11Z",
        "name": "John Smith",
        "identity_class": "individual",
        "x_foo": "bar",
    });

    let err = registry.parse(raw.clone(), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExtraProperties);

    let identity = registry
        .parse_with(raw, &ParseOptions::new().with_allow_custom(true))
        .unwrap();
    assert_eq!(identity.get_str("x_foo"), Some("bar"));
    let last = identity.serialized_properties().last().map(|(name, _)| name);
    assert_eq!(last, Some("x_foo"));
}

#[test]
fn test_parse_is_idempotent() {
    let registry = fresh_registry();
    let raw = json!({
        "type": "campaign",
        "spec_version": "2.1",
        "id": "campaign--8e2e2d2b-17d4-4cbf-938f-98ee46b3cd3f",
        "created": "2016-04-06T20:03:00.000Z",
        "modified": "2016-04-06T20:03:00.000Z",
        "name": "Green Group Attacks Against Finance",
        "description": "Campaign by Green Group against a series of targets in the financial services sector.",
        "first_seen": "2016-04-06T20:03:00.123456Z",
    });

    let first = registry.parse(raw, None).unwrap();
    let second = registry.parse(first.to_canonical_json().as_str(), None).unwrap();

    assert_eq!(first.to_canonical_json(), second.to_canonical_json());
    assert_eq!(
        second.timestamp("first_seen").unwrap().to_stix_string(),
        "2016-04-06T20:03:00.123456Z"
    );
}

#[test]
fn test_parse_created_gets_millisecond_padding() {
    let registry = fresh_registry();
    let identity = registry
        .parse(
            json!({
                "type": "identity",
                "spec_version": "2.1",
                "id": "identity--311b2d2d-f010-4473-83ec-1edf84858f4c",
                "created": "2015-12-21T19:59:11Z",
                "modified": "2015-12-21T19:59:11.5Z",
                "name": "John Smith",
            }),
            None,
        )
        .unwrap();

    let value = identity.to_json_value();
    assert_eq!(value["created"], "2015-12-21T19:59:11.000Z");
    assert_eq!(value["modified"], "2015-12-21T19:59:11.500Z");
}
