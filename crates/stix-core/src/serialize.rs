//! Canonical serialization
//!
//! Output keys follow the schema's declared order; properties that only
//! hold their static default are skipped. Serialization never re-runs
//! validation.

use crate::object::StixObject;
use crate::value::PropertyValue;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// Indent used by pretty output
const PRETTY_INDENT: &[u8] = b"    ";

impl StixObject {
    /// Canonical JSON value
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        Value::Object(
            self.serialized_properties()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect::<Map<String, Value>>(),
        )
    }

    /// Compact canonical JSON text
    ///
    /// # Example
    /// ```rust,ignore
    /// let text = report.to_canonical_json();
    /// assert!(text.starts_with(r#"{"type":"report","spec_version":"2.1","id":"report--"#));
    /// ```
    #[must_use]
    pub fn to_canonical_json(&self) -> String {
        self.to_json_value().to_string()
    }

    /// JSON text with a four space indent
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        let value = self.to_json_value();
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(PRETTY_INDENT));
        if value.serialize(&mut serializer).is_err() {
            return value.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Display for StixObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pretty_json())
    }
}

impl Serialize for StixObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in self.serialized_properties() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Timestamp(ts) => ts.serialize(serializer),
            Self::Identifier(id) => id.serialize(serializer),
            Self::List(items) => serializer.collect_seq(items),
            Self::Dictionary(props) => serializer.collect_map(props),
            Self::Json(value) => value.serialize(serializer),
            Self::Object(obj) => obj.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::{Precision, PrecisionConstraint, Timestamp};
    use crate::value::Properties;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn sample() -> StixObject {
        let mut props = Properties::new();
        props.insert("type".into(), PropertyValue::String("campaign".into()));
        props.insert("spec_version".into(), PropertyValue::String("2.1".into()));
        props.insert(
            "id".into(),
            PropertyValue::Identifier(
                "campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c".parse().unwrap(),
            ),
        );
        props.insert(
            "created".into(),
            PropertyValue::Timestamp(
                Timestamp::parse(
                    "2016-04-06T20:03:00Z",
                    Precision::Millisecond,
                    PrecisionConstraint::Min,
                )
                .unwrap(),
            ),
        );
        props.insert("name".into(), PropertyValue::String("Green Group Attacks".into()));
        props.insert("revoked".into(), PropertyValue::Boolean(false));
        StixObject::from_parts("campaign", "2.1", true, props, vec!["revoked".into()])
    }

    #[test]
    fn compact_output_in_declared_order() {
        assert_eq!(
            sample().to_canonical_json(),
            r#"{"type":"campaign","spec_version":"2.1","id":"campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c","created":"2016-04-06T20:03:00.000Z","name":"Green Group Attacks"}"#
        );
    }

    #[test]
    fn pretty_output_uses_four_spaces() {
        let expected = r#"{
    "type": "campaign",
    "spec_version": "2.1",
    "id": "campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c",
    "created": "2016-04-06T20:03:00.000Z",
    "name": "Green Group Attacks"
}"#;
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn serde_matches_json_value() {
        let obj = sample();
        assert_eq!(serde_json::to_value(&obj).unwrap(), obj.to_json_value());
    }

    #[test]
    fn nested_objects_serialize_inline() {
        let member = Arc::new(sample());
        let mut props = Properties::new();
        props.insert("type".into(), PropertyValue::String("bundle".into()));
        props.insert(
            "objects".into(),
            PropertyValue::List(vec![PropertyValue::Object(member)]),
        );
        let bundle = StixObject::from_parts("bundle", "2.1", true, props, Vec::new());
        let value = bundle.to_json_value();
        assert_eq!(value["objects"][0]["name"], "Green Group Attacks");
        assert!(value["objects"][0].get("revoked").is_none());
        assert_eq!(serde_json::to_value(&bundle).unwrap(), value);
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(sample().to_canonical_json(), sample().to_canonical_json());
    }
}
