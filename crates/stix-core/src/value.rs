//! Property values
//!
//! [`Input`] is what callers hand to the constructor; [`PropertyValue`] is
//! what a validated object holds after its descriptors have run.

use crate::identifier::Identifier;
use crate::object::StixObject;
use crate::timestamp::Timestamp;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Ordered validated properties, in canonical serialization order
pub type Properties = IndexMap<String, PropertyValue>;

/// Ordered raw inputs keyed by property name
pub type Inputs = IndexMap<String, Input>;

/// Validated value of one property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(Timestamp),
    Identifier(Identifier),
    List(Vec<PropertyValue>),
    /// Validated embedded sub-object (external reference, kill chain phase, ...)
    Dictionary(Properties),
    /// Free-form JSON kept verbatim
    Json(Value),
    /// Full object (bundle members)
    Object(Arc<StixObject>),
}

impl PropertyValue {
    /// Text of string-like values (strings, identifiers, JSON strings)
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Identifier(id) => Some(id.as_str()),
            Self::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Json(v) => v.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(i) => Some(*i as f64),
            Self::Json(v) => v.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::Json(v) => v.as_bool(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Identifier(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_dictionary(&self) -> Option<&Properties> {
        match self {
            Self::Dictionary(props) => Some(props),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Arc<StixObject>> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Canonical JSON form of this value
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Timestamp(ts) => Value::String(ts.to_stix_string()),
            Self::Identifier(id) => Value::String(id.as_str().to_string()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Dictionary(props) => Value::Object(
                props
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Json(v) => v.clone(),
            Self::Object(obj) => obj.to_json_value(),
        }
    }
}

/// Raw input for one property
///
/// References accept either a bare identifier (`Json`) or a constructed
/// object (`Object`); `List` lets the two forms be mixed.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Json(Value),
    Object(Arc<StixObject>),
    List(Vec<Input>),
}

impl Input {
    /// JSON `null` inputs are treated as absent
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    /// Flatten to JSON, replacing objects by their canonical form
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Json(v) => v.clone(),
            Self::Object(obj) => obj.to_json_value(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    /// Short description for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Json(Value::Null) => "null".to_string(),
            Self::Json(Value::Bool(b)) => format!("boolean {b}"),
            Self::Json(Value::Number(n)) => format!("number {n}"),
            Self::Json(Value::String(s)) => format!("string '{s}'"),
            Self::Json(Value::Array(_)) | Self::List(_) => "list".to_string(),
            Self::Json(Value::Object(_)) => "JSON object".to_string(),
            Self::Object(obj) => format!("{} object", obj.object_type()),
        }
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_string()))
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

impl From<bool> for Input {
    fn from(value: bool) -> Self {
        Self::Json(Value::Bool(value))
    }
}

impl From<i64> for Input {
    fn from(value: i64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<f64> for Input {
    fn from(value: f64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<&Identifier> for Input {
    fn from(value: &Identifier) -> Self {
        Self::Json(Value::String(value.as_str().to_string()))
    }
}

impl From<Timestamp> for Input {
    fn from(value: Timestamp) -> Self {
        Self::Json(Value::String(value.to_stix_string()))
    }
}

impl From<StixObject> for Input {
    fn from(value: StixObject) -> Self {
        Self::Object(Arc::new(value))
    }
}

impl From<Arc<StixObject>> for Input {
    fn from(value: Arc<StixObject>) -> Self {
        Self::Object(value)
    }
}

impl From<&PropertyValue> for Input {
    fn from(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Object(obj) => Self::Object(Arc::clone(obj)),
            PropertyValue::List(items) => Self::List(items.iter().map(Self::from).collect()),
            other => Self::Json(other.to_json()),
        }
    }
}

impl<T: Into<Input>> From<Vec<T>> for Input {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
