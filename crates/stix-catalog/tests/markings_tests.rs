use pretty_assertions::assert_eq;
use serde_json::json;
use stix_catalog::TlpLevel;
use stix_core::Input;
use stix_test_utils::{fresh_registry, indicator_inputs};

const EXPECTED_TLP_GREEN: &str = r#"{
    "type": "marking-definition",
    "spec_version": "2.1",
    "id": "marking-definition--34098fce-860f-48ae-8e50-ebd3cc5e41da",
    "created": "2017-01-20T00:00:00.000Z",
    "definition_type": "tlp",
    "name": "TLP:GREEN",
    "definition": {
        "tlp": "green"
    }
}"#;

#[test]
fn test_tlp_green_21() {
    let registry = fresh_registry();
    let marking = TlpLevel::Green.definition(&registry, "2.1").unwrap();

    assert_eq!(marking.to_string(), EXPECTED_TLP_GREEN);
}

#[test]
fn test_tlp_white_20_has_no_name() {
    let registry = fresh_registry();
    let marking = TlpLevel::White.definition(&registry, "2.0").unwrap();

    assert_eq!(
        marking.to_canonical_json(),
        r#"{"type":"marking-definition","id":"marking-definition--613f2e26-407d-48c7-9eca-b8e91df99dc9","created":"2017-01-20T00:00:00.000Z","definition_type":"tlp","definition":{"tlp":"white"}}"#
    );
}

#[test]
fn test_object_marking_refs() {
    let registry = fresh_registry();
    let mut inputs = indicator_inputs();
    inputs.insert(
        "object_marking_refs".to_string(),
        Input::from(TlpLevel::Amber.id()),
    );
    let indicator = registry.construct("indicator", None, inputs).unwrap();

    let refs = indicator.references("object_marking_refs");
    assert_eq!(refs.len(), 1);
    assert_eq!(TlpLevel::from_id(refs[0].as_str()), Some(TlpLevel::Amber));
}

#[test]
fn test_object_marking_refs_must_be_markings() {
    let registry = fresh_registry();
    let mut inputs = indicator_inputs();
    inputs.insert(
        "object_marking_refs".to_string(),
        Input::from(json!(["identity--311b2d2d-f010-4473-83ec-1edf84858f4c"])),
    );
    let err = registry.construct("indicator", None, inputs).unwrap_err();

    assert_eq!(err.prop_name(), Some("object_marking_refs"));
}

#[test]
fn test_granular_markings() {
    let registry = fresh_registry();
    let mut inputs = indicator_inputs();
    inputs.insert(
        "granular_markings".to_string(),
        Input::from(json!([{
            "marking_ref": TlpLevel::Red.id(),
            "selectors": ["description"],
        }])),
    );
    let indicator = registry.construct("indicator", None, inputs).unwrap();
    assert_eq!(
        indicator.to_json_value()["granular_markings"],
        json!([{"marking_ref": TlpLevel::Red.id(), "selectors": ["description"]}])
    );

    let mut inputs = indicator_inputs();
    inputs.insert(
        "granular_markings".to_string(),
        Input::from(json!([{
            "lang": "en",
            "marking_ref": TlpLevel::Red.id(),
            "selectors": ["description"],
        }])),
    );
    let err = registry.construct("indicator", None, inputs).unwrap_err();
    assert_eq!(err.prop_name(), Some("granular_markings"));
}
