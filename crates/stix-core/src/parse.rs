//! Parse dispatcher
//!
//! Turns JSON text or a decoded value into a validated object: read `type`,
//! pick the spec version, look the schema up, construct. Types with no
//! schema are kept as unregistered passthrough objects.

use crate::config::ParseOptions;
use crate::construct;
use crate::custom;
use crate::error::{Result, StixError};
use crate::object::StixObject;
use crate::registry::TypeRegistry;
use crate::value::{Input, Inputs};
use serde_json::Value;

/// Raw input accepted by [`TypeRegistry::parse`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParseInput<'a> {
    /// JSON text
    Text(&'a str),
    /// Already decoded JSON
    Value(Value),
}

impl<'a> From<&'a str> for ParseInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for ParseInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for ParseInput<'_> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&Value> for ParseInput<'_> {
    fn from(value: &Value) -> Self {
        Self::Value(value.clone())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Observable types that carry an `id` without `spec_version` in 2.1
const OBSERVABLE_TYPES_21: &[&str] = &[
    "artifact",
    "autonomous-system",
    "directory",
    "domain-name",
    "email-addr",
    "email-message",
    "file",
    "ipv4-addr",
    "ipv6-addr",
    "mac-addr",
    "mutex",
    "network-traffic",
    "process",
    "software",
    "url",
    "user-account",
    "windows-registry-key",
    "x509-certificate",
];

impl TypeRegistry {
    /// Version of an object that names none, judged from its shape
    fn detect_version(&self, type_name: &str, map: &serde_json::Map<String, Value>) -> String {
        let default = self.effective_version(None);
        if !map.contains_key("id") || type_name == "bundle" || OBSERVABLE_TYPES_21.contains(&type_name) {
            return default.to_string();
        }
        // Types that only exist in 2.1 keep the default.
        let versions = self.versions(type_name);
        if !versions.is_empty() && !versions.iter().any(|v| v.as_str() == "2.0") {
            return default.to_string();
        }
        tracing::debug!(type_name, "no spec_version on an identified object, reading as 2.0");
        "2.0".to_string()
    }

    /// Parse one object
    ///
    /// The object's own `spec_version` wins over `version`. With neither, an
    /// object carrying an `id` is read as 2.0 (2.0 objects never carry
    /// `spec_version`); otherwise the configured default applies.
    ///
    /// # Errors
    /// - [`StixError::InvalidJson`] on malformed text or a non-object
    /// - [`StixError::MissingType`] if `type` is absent or not a string
    /// - [`StixError::UnsupportedVersion`] on an unknown spec version
    /// - any construction error of the resolved schema
    pub fn parse<'a>(&self, raw: impl Into<ParseInput<'a>>, version: Option<&str>) -> Result<StixObject> {
        let options = ParseOptions {
            version: version.map(str::to_string),
            allow_custom: None,
        };
        self.parse_with(raw, &options)
    }

    /// Parse one object with per-call options
    ///
    /// # Errors
    /// Same as [`parse`](Self::parse)
    pub fn parse_with<'a>(
        &self,
        raw: impl Into<ParseInput<'a>>,
        options: &ParseOptions,
    ) -> Result<StixObject> {
        let value = match raw.into() {
            ParseInput::Text(text) => {
                serde_json::from_str(text).map_err(|e| StixError::InvalidJson {
                    message: e.to_string(),
                })?
            }
            ParseInput::Value(value) => value,
        };

        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(StixError::InvalidJson {
                    message: format!("expected a JSON object, got {}", json_kind(&other)),
                })
            }
        };

        let type_name = match map.get("type") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(StixError::MissingType {
                    reason: format!("'type' must be a string, got {}", json_kind(other)),
                })
            }
            None => {
                return Err(StixError::MissingType {
                    reason: "no 'type' property".to_string(),
                })
            }
        };

        let version = match map.get("spec_version") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(StixError::invalid_value(
                    &type_name,
                    "spec_version",
                    format!("must be a string, got {}", json_kind(other)),
                ))
            }
            None => match options.version.as_deref() {
                Some(version) => version.to_string(),
                None => self.detect_version(&type_name, &map),
            },
        };

        if !self.supports_version(&version) {
            return Err(StixError::UnsupportedVersion { version });
        }

        let inputs: Inputs = map
            .into_iter()
            .map(|(name, value)| (name, Input::Json(value)))
            .collect();

        match self.get(&type_name, &version) {
            Some(schema) => {
                tracing::debug!(
                    type_name = type_name.as_str(),
                    spec_version = version.as_str(),
                    "parsing registered type"
                );
                let ctx = self.context(&schema, self.effective_allow_custom(options));
                construct::build_object(&schema, inputs, &ctx)
            }
            None => {
                tracing::debug!(
                    type_name = type_name.as_str(),
                    spec_version = version.as_str(),
                    "no schema registered, keeping as unregistered object"
                );
                custom::unregistered(&type_name, &version, inputs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::property::{DefaultValue, PropertyDescriptor, PropertyKind};
    use crate::schema::{ObjectCategory, ObjectSchema};
    use serde_json::json;

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::default();
        for version in ["2.0", "2.1"] {
            registry
                .register(
                    ObjectSchema::new("x-widget", version, ObjectCategory::Custom)
                        .with_property(PropertyDescriptor::new("type", PropertyKind::Type).required())
                        .with_property(
                            PropertyDescriptor::new("id", PropertyKind::Id)
                                .required()
                                .with_default(DefaultValue::GeneratedId),
                        )
                        .with_property(PropertyDescriptor::new("foo", PropertyKind::string())),
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn invalid_text_rejected() {
        let err = registry().parse("{not json", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidJson);
    }

    #[test]
    fn non_object_rejected() {
        let err = registry().parse(json!([1, 2]), None).unwrap_err();
        assert_eq!(
            err,
            StixError::InvalidJson {
                message: "expected a JSON object, got an array".into()
            }
        );
    }

    #[test]
    fn missing_type_rejected() {
        let err = registry().parse(json!({"foo": "bar"}), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingType);

        let err = registry().parse(json!({"type": 7}), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingType);
    }

    #[test]
    fn spec_version_must_be_string() {
        let err = registry()
            .parse(json!({"type": "x-widget", "spec_version": 2.1}), None)
            .unwrap_err();
        assert_eq!(err.prop_name(), Some("spec_version"));
    }

    #[test]
    fn caller_version_used_when_input_has_none() {
        let obj = registry()
            .parse(json!({"type": "x-widget", "foo": "a"}), Some("2.0"))
            .unwrap();
        assert_eq!(obj.spec_version(), "2.0");
    }

    #[test]
    fn default_version_when_nobody_names_one() {
        let obj = registry().parse(r#"{"type": "x-widget"}"#, None).unwrap();
        assert_eq!(obj.spec_version(), "2.1");
    }

    #[test]
    fn identified_object_without_version_reads_as_20() {
        let registry = registry();
        let obj = registry
            .parse(
                json!({"type": "x-widget", "id": "x-widget--0f1c9ec0-4bd7-4d0c-a5a8-1a83b0e4ec7a"}),
                None,
            )
            .unwrap();
        assert_eq!(obj.spec_version(), "2.0");

        let obj = registry
            .parse(
                json!({"type": "x-widget", "id": "x-widget--0f1c9ec0-4bd7-4d0c-a5a8-1a83b0e4ec7a"}),
                Some("2.1"),
            )
            .unwrap();
        assert_eq!(obj.spec_version(), "2.1");
    }

    #[test]
    fn observables_and_bundles_keep_default_version() {
        let obj = registry()
            .parse(
                json!({"type": "file", "id": "file--5a7d6d4f-1d2a-4b3e-9c6a-0c3f2a9b8e71", "name": "a.exe"}),
                None,
            )
            .unwrap();
        assert_eq!(obj.spec_version(), "2.1");

        let obj = registry()
            .parse(
                json!({"type": "bundle", "id": "bundle--f64de948-7067-4534-8018-85f03d470625"}),
                None,
            )
            .unwrap();
        assert_eq!(obj.spec_version(), "2.1");
    }

    #[test]
    fn unknown_version_rejected() {
        let err = registry()
            .parse(json!({"type": "x-widget"}), Some("9.9"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
    }

    #[test]
    fn unknown_type_kept_as_passthrough() {
        let obj = registry()
            .parse(json!({"type": "x-other", "bar": [1, 2, 3]}), None)
            .unwrap();
        assert!(!obj.is_registered());
        assert_eq!(obj.object_type(), "x-other");
    }

    #[test]
    fn parse_options_allow_custom() {
        let registry = registry();
        let raw = json!({"type": "x-widget", "extra_field": 1});
        assert_eq!(
            registry.parse(&raw, None).unwrap_err().kind(),
            ErrorKind::ExtraProperties
        );
        let obj = registry
            .parse_with(&raw, &ParseOptions::new().with_allow_custom(true))
            .unwrap();
        assert!(obj.contains("extra_field"));
    }
}
