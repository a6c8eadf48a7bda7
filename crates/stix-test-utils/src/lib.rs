//! Testing utilities for the STIX engine workspace
//!
//! Shared fixtures: well-known identifiers, canonical texts, and input maps
//! for building objects in tests.

#![allow(missing_docs)]

use serde_json::{json, Value};
use stix_core::{EngineConfig, Input, Inputs, TypeRegistry};

pub const REPORT_ID: &str = "report--84e4d88f-44ea-4bcd-bbf3-b2c1c320bcb3";
pub const IDENTITY_ID: &str = "identity--a463ffb3-1bd9-4d94-b02d-74e4f1658283";
pub const INDICATOR_ID: &str = "indicator--26ffb872-1dd9-446e-b6f5-d58527e5b5d2";
pub const CAMPAIGN_ID: &str = "campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c";
pub const RELATIONSHIP_ID: &str = "relationship--f82356ae-fe6c-437c-9c24-6b64314ae68a";
pub const MALWARE_ID: &str = "malware--9c4638ec-f1de-4ddb-abf4-1b760417654e";
pub const SIGHTING_ID: &str = "sighting--bfbc19db-ec35-4e45-beed-f8bde2a772fb";
pub const BUNDLE_ID: &str = "bundle--f64de948-7067-4534-8018-85f03d470625";

pub const FAKE_TIME: &str = "2017-01-01T12:34:56.000Z";

/// Report as its canonical pretty text
pub const EXPECTED_REPORT: &str = r#"{
    "type": "report",
    "spec_version": "2.1",
    "id": "report--84e4d88f-44ea-4bcd-bbf3-b2c1c320bcb3",
    "created_by_ref": "identity--a463ffb3-1bd9-4d94-b02d-74e4f1658283",
    "created": "2015-12-21T19:59:11.000Z",
    "modified": "2015-12-21T19:59:11.000Z",
    "name": "The Black Vine Cyberespionage Group",
    "description": "A simple report with an indicator and campaign",
    "report_types": [
        "campaign"
    ],
    "published": "2016-01-20T17:00:00Z",
    "object_refs": [
        "indicator--26ffb872-1dd9-446e-b6f5-d58527e5b5d2",
        "campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c",
        "relationship--f82356ae-fe6c-437c-9c24-6b64314ae68a"
    ]
}"#;

/// Registry with every built-in schema and default configuration
pub fn fresh_registry() -> TypeRegistry {
    registry_with(EngineConfig::default())
}

pub fn registry_with(config: EngineConfig) -> TypeRegistry {
    stix_catalog::builtin_registry(config).expect("built-in schemas load into an empty registry")
}

/// Turn a JSON object literal into construction inputs
pub fn inputs(value: Value) -> Inputs {
    match value {
        Value::Object(map) => map.into_iter().map(|(k, v)| (k, Input::Json(v))).collect(),
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Minimal valid 2.1 indicator
pub fn indicator_inputs() -> Inputs {
    inputs(json!({
        "indicator_types": ["malicious-activity"],
        "pattern_type": "stix",
        "pattern": "[file:hashes.MD5 = 'd41d8cd98f00b204e9800998ecf8427e']",
        "valid_from": "2017-01-01T12:34:56Z",
    }))
}

/// Report inputs matching [`EXPECTED_REPORT`]
pub fn report_inputs() -> Inputs {
    inputs(json!({
        "id": REPORT_ID,
        "created_by_ref": IDENTITY_ID,
        "created": "2015-12-21T19:59:11.000Z",
        "modified": "2015-12-21T19:59:11.000Z",
        "name": "The Black Vine Cyberespionage Group",
        "description": "A simple report with an indicator and campaign",
        "published": "2016-01-20T17:00:00Z",
        "report_types": ["campaign"],
        "object_refs": [INDICATOR_ID, CAMPAIGN_ID, RELATIONSHIP_ID],
    }))
}

/// Minimal valid 2.1 malware
pub fn malware_inputs() -> Inputs {
    inputs(json!({
        "id": MALWARE_ID,
        "created": FAKE_TIME,
        "modified": FAKE_TIME,
        "name": "Cryptolocker",
        "malware_types": ["ransomware"],
        "is_family": false,
    }))
}
