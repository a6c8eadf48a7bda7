use pretty_assertions::assert_eq;
use serde_json::json;
use stix_core::{ErrorKind, Input};
use stix_test_utils::{fresh_registry, inputs, malware_inputs, BUNDLE_ID, INDICATOR_ID, MALWARE_ID};

fn indicator_json() -> serde_json::Value {
    json!({
        "type": "indicator",
        "spec_version": "2.1",
        "id": INDICATOR_ID,
        "created": "2017-01-01T12:34:56.000Z",
        "modified": "2017-01-01T12:34:56.000Z",
        "pattern": "[file:hashes.MD5 = 'd41d8cd98f00b204e9800998ecf8427e']",
        "pattern_type": "stix",
        "valid_from": "2017-01-01T12:34:56Z",
    })
}

#[test]
fn test_parse_bundle_members() {
    let registry = fresh_registry();
    let bundle = registry
        .parse(
            json!({
                "type": "bundle",
                "id": BUNDLE_ID,
                "objects": [
                    indicator_json(),
                    {"type": "x-thing", "id": "x-thing--4527e5de-8572-446a-a57a-706f15467461"},
                ],
            }),
            None,
        )
        .unwrap();

    let objects = bundle.list("objects").unwrap();
    assert_eq!(objects.len(), 2);
    let indicator = objects[0].as_object().unwrap();
    assert!(indicator.is_registered());
    assert_eq!(indicator.id().unwrap().as_str(), INDICATOR_ID);
    assert!(!objects[1].as_object().unwrap().is_registered());
    assert!(!bundle.contains("spec_version"));
}

#[test]
fn test_bundle_serializes_members_in_canonical_form() {
    let registry = fresh_registry();
    let malware = registry.construct("malware", None, malware_inputs()).unwrap();

    let bundle = registry
        .construct(
            "bundle",
            None,
            inputs(json!({"id": BUNDLE_ID})).into_iter().chain([(
                "objects".to_string(),
                Input::List(vec![Input::from(malware.clone())]),
            )]).collect(),
        )
        .unwrap();

    let value = bundle.to_json_value();
    assert_eq!(value["objects"][0], malware.to_json_value());
    assert_eq!(value["objects"][0]["id"], MALWARE_ID);
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["type", "id", "objects"]);
}

#[test]
fn test_bundle_member_errors_surface() {
    let registry = fresh_registry();
    let mut bad = indicator_json();
    bad["valid_from"] = json!("not a time");

    let err = registry
        .parse(json!({"type": "bundle", "id": BUNDLE_ID, "objects": [bad]}), None)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(err.object_type(), Some("bundle"));
    assert_eq!(err.prop_name(), Some("objects"));
}

#[test]
fn test_bundle_20_carries_spec_version() {
    let registry = fresh_registry();
    let bundle = registry
        .parse(
            json!({
                "type": "bundle",
                "id": BUNDLE_ID,
                "spec_version": "2.0",
                "objects": [{
                    "type": "campaign",
                    "id": "campaign--8e2e2d2b-17d4-4cbf-938f-98ee46b3cd3f",
                    "created": "2016-04-06T20:03:00.000Z",
                    "modified": "2016-04-06T20:03:00.000Z",
                    "name": "Green Group Attacks Against Finance",
                }],
            }),
            None,
        )
        .unwrap();

    assert_eq!(bundle.spec_version(), "2.0");
    let campaign = bundle.list("objects").unwrap()[0].as_object().unwrap();
    assert_eq!(campaign.spec_version(), "2.0");
    assert!(!campaign.contains("spec_version"));
}

#[test]
fn test_empty_bundle_objects_rejected() {
    let registry = fresh_registry();
    let err = registry
        .parse(json!({"type": "bundle", "id": BUNDLE_ID, "objects": []}), None)
        .unwrap_err();

    assert_eq!(err.prop_name(), Some("objects"));
}
