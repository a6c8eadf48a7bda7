//! Property descriptors
//!
//! A [`PropertyDescriptor`] declares one field of one object type: its
//! [`PropertyKind`] (built-in validation and coercion), whether it is
//! required, its default, and an optional custom check. Schemas are ordered
//! lists of descriptors; the constructor runs them in declared order.
//!
//! # Example
//! ```rust,ignore
//! let refs = PropertyDescriptor::new(
//!     "object_refs",
//!     PropertyKind::list_of(PropertyKind::reference(ReferenceRule::ANY)),
//! )
//! .required();
//! ```

use crate::config::ParseOptions;
use crate::construct;
use crate::error::StixError;
use crate::identifier::{Identifier, IdentifierError};
use crate::registry::TypeRegistry;
use crate::schema::ObjectSchema;
use crate::timestamp::{Precision, PrecisionConstraint, Timestamp, TimestampError};
use crate::value::{Input, Inputs, PropertyValue};
use serde_json::Value;
use std::sync::Arc;

/// Spec version whose identifiers must carry RFC 4122 UUIDs
const STRICT_ID_VERSION: &str = "2.1";

/// Maximum length of dictionary keys
const MAX_KEY_LENGTH: usize = 250;

/// Custom per-property check, run after the built-in validation
pub type PropertyCheck = fn(&PropertyValue) -> Result<(), String>;

/// Errors raised by a single property validator
///
/// The constructor wraps these with the owning object type and property name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    /// Input has the wrong JSON shape
    #[error("expected {expected}, got {found}")]
    WrongType { expected: &'static str, found: String },

    /// Identifier rejected
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Timestamp rejected
    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    /// Value rejected by a rule
    #[error("{0}")]
    Invalid(String),

    /// List element rejected
    #[error("item {index}: {source}")]
    Item {
        index: usize,
        source: Box<PropertyError>,
    },

    /// Embedded or member object rejected
    #[error(transparent)]
    Nested(Box<StixError>),
}

impl PropertyError {
    fn wrong_type(expected: &'static str, found: &Input) -> Self {
        Self::WrongType {
            expected,
            found: found.describe(),
        }
    }
}

/// Allowed and forbidden target types of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceRule {
    /// If non-empty, the only types that may be referenced
    pub valid_types: &'static [&'static str],
    /// Types that may never be referenced
    pub invalid_types: &'static [&'static str],
}

impl ReferenceRule {
    /// Any well-formed identifier
    pub const ANY: Self = Self {
        valid_types: &[],
        invalid_types: &[],
    };

    /// Only the listed types
    #[inline]
    #[must_use]
    pub const fn to(valid_types: &'static [&'static str]) -> Self {
        Self {
            valid_types,
            invalid_types: &[],
        }
    }

    /// Anything but the listed types
    #[inline]
    #[must_use]
    pub const fn except(invalid_types: &'static [&'static str]) -> Self {
        Self {
            valid_types: &[],
            invalid_types,
        }
    }

    fn check(&self, type_name: &str) -> Result<(), PropertyError> {
        if !self.valid_types.is_empty() && !self.valid_types.contains(&type_name) {
            return Err(PropertyError::Invalid(format!(
                "references must point to {}; got '{type_name}'",
                self.valid_types.join(" or ")
            )));
        }
        if self.invalid_types.contains(&type_name) {
            return Err(PropertyError::Invalid(format!(
                "references to '{type_name}' objects are not allowed"
            )));
        }
        Ok(())
    }
}

/// Built-in validator family of a property
#[derive(Debug, Clone)]
pub enum PropertyKind {
    /// `type`: must equal the object's type
    Type,
    /// `spec_version`: must equal the schema's version
    SpecVersion,
    /// `id`: identifier shape (prefix checked by the constructor)
    Id,
    /// Text
    String {
        /// Reject the empty string
        non_empty: bool,
    },
    /// Whole number within optional bounds
    Integer {
        /// Inclusive lower bound
        min: Option<i64>,
        /// Inclusive upper bound
        max: Option<i64>,
    },
    /// Number within optional bounds
    Float {
        /// Inclusive lower bound
        min: Option<f64>,
        /// Inclusive upper bound
        max: Option<f64>,
    },
    /// `true` or `false`
    Boolean,
    /// RFC 3339 instant
    Timestamp {
        /// Sub-second digits kept
        precision: Precision,
        /// Whether `precision` is exact or a minimum
        constraint: PrecisionConstraint,
    },
    /// Closed set of values
    Enum(&'static [&'static str]),
    /// Suggested values; others are accepted
    OpenVocab(&'static [&'static str]),
    /// Identifier of another object
    Reference(ReferenceRule),
    /// Homogeneous list
    List {
        /// Kind of each item
        inner: Box<PropertyKind>,
        /// Fewest items accepted
        min_length: usize,
    },
    /// Free-form JSON object
    Dictionary,
    /// Hash algorithm name to hash value
    Hashes,
    /// Nested sub-object validated by its own schema
    Embedded(Arc<ObjectSchema>),
    /// A full STIX object (bundle members)
    Objects,
    /// Any JSON value, kept verbatim
    Json,
}

impl PropertyKind {
    /// Any text
    #[inline]
    #[must_use]
    pub const fn string() -> Self {
        Self::String { non_empty: false }
    }

    /// Text that must not be empty
    #[inline]
    #[must_use]
    pub const fn non_empty_string() -> Self {
        Self::String { non_empty: true }
    }

    /// Unbounded integer
    #[inline]
    #[must_use]
    pub const fn integer() -> Self {
        Self::Integer {
            min: None,
            max: None,
        }
    }

    /// Integer within `min..=max`
    #[inline]
    #[must_use]
    pub const fn integer_range(min: i64, max: i64) -> Self {
        Self::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Float within optional inclusive bounds
    #[inline]
    #[must_use]
    pub const fn float_range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Float { min, max }
    }

    /// Timestamp rendered with a fraction only when non-zero
    #[inline]
    #[must_use]
    pub const fn timestamp() -> Self {
        Self::Timestamp {
            precision: Precision::Any,
            constraint: PrecisionConstraint::Min,
        }
    }

    /// Timestamp rendered with at least millisecond digits
    #[inline]
    #[must_use]
    pub const fn timestamp_millis() -> Self {
        Self::Timestamp {
            precision: Precision::Millisecond,
            constraint: PrecisionConstraint::Min,
        }
    }

    /// Identifier checked against `rule`
    #[inline]
    #[must_use]
    pub const fn reference(rule: ReferenceRule) -> Self {
        Self::Reference(rule)
    }

    /// List that must not be empty
    #[inline]
    #[must_use]
    pub fn list_of(inner: PropertyKind) -> Self {
        Self::List {
            inner: Box::new(inner),
            min_length: 1,
        }
    }

    /// Sub-object validated by `schema`
    #[inline]
    #[must_use]
    pub fn embedded(schema: Arc<ObjectSchema>) -> Self {
        Self::Embedded(schema)
    }

    /// Precision of timestamp kinds
    #[must_use]
    pub fn timestamp_precision(&self) -> Option<(Precision, PrecisionConstraint)> {
        match self {
            Self::Timestamp {
                precision,
                constraint,
            } => Some((*precision, *constraint)),
            _ => None,
        }
    }

    /// Validate and coerce one raw input
    ///
    /// # Errors
    /// Returns error describing why the input was rejected
    pub fn validate(
        &self,
        name: &str,
        raw: &Input,
        ctx: &ValidationContext<'_>,
    ) -> Result<PropertyValue, PropertyError> {
        match self {
            Self::Type => {
                let s = expect_str(raw, "string")?;
                if s == ctx.object_type {
                    Ok(PropertyValue::String(s.to_string()))
                } else {
                    Err(PropertyError::Invalid(format!(
                        "must equal '{}'",
                        ctx.object_type
                    )))
                }
            }
            Self::SpecVersion => {
                let s = expect_str(raw, "string")?;
                if s == ctx.spec_version {
                    Ok(PropertyValue::String(s.to_string()))
                } else {
                    Err(PropertyError::Invalid(format!(
                        "must equal '{}'",
                        ctx.spec_version
                    )))
                }
            }
            Self::Id => {
                let s = expect_str(raw, "identifier string")?;
                Ok(PropertyValue::Identifier(Identifier::parse(
                    s,
                    ctx.strict_ids(),
                )?))
            }
            Self::String { non_empty } => {
                let s = expect_str(raw, "string")?;
                if *non_empty && s.is_empty() {
                    return Err(PropertyError::Invalid("must not be empty".to_string()));
                }
                Ok(PropertyValue::String(s.to_string()))
            }
            Self::Integer { min, max } => {
                let n = match raw {
                    Input::Json(Value::Number(n)) => n.as_i64().ok_or_else(|| {
                        PropertyError::Invalid(format!("{n} is not a 64-bit integer"))
                    })?,
                    other => return Err(PropertyError::wrong_type("integer", other)),
                };
                check_bounds(n, *min, *max)?;
                Ok(PropertyValue::Integer(n))
            }
            Self::Float { min, max } => {
                let f = match raw {
                    Input::Json(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                        PropertyError::Invalid(format!("{n} is not representable as a float"))
                    })?,
                    other => return Err(PropertyError::wrong_type("number", other)),
                };
                check_bounds(f, *min, *max)?;
                Ok(PropertyValue::Float(f))
            }
            Self::Boolean => coerce_bool(raw).map(PropertyValue::Boolean),
            Self::Timestamp {
                precision,
                constraint,
            } => {
                let s = expect_str(raw, "timestamp string")?;
                Ok(PropertyValue::Timestamp(Timestamp::parse(
                    s,
                    *precision,
                    *constraint,
                )?))
            }
            Self::Enum(allowed) => {
                let s = expect_str(raw, "string")?;
                if allowed.contains(&s) {
                    Ok(PropertyValue::String(s.to_string()))
                } else {
                    Err(PropertyError::Invalid(format!(
                        "'{s}' is not one of: {}",
                        allowed.join(", ")
                    )))
                }
            }
            Self::OpenVocab(vocab) => {
                let s = expect_str(raw, "string")?;
                if !vocab.contains(&s) {
                    tracing::debug!(
                        object_type = ctx.object_type,
                        property = name,
                        value = s,
                        "value outside suggested vocabulary"
                    );
                }
                Ok(PropertyValue::String(s.to_string()))
            }
            Self::Reference(rule) => validate_reference(rule, raw, ctx),
            Self::List { inner, min_length } => validate_list(name, inner, *min_length, raw, ctx),
            Self::Dictionary => validate_dictionary(raw, false),
            Self::Hashes => validate_dictionary(raw, true),
            Self::Embedded(schema) => match raw {
                Input::Json(Value::Object(map)) => {
                    let inputs: Inputs = map
                        .iter()
                        .map(|(k, v)| (k.clone(), Input::Json(v.clone())))
                        .collect();
                    construct::build_embedded(schema, inputs, ctx)
                        .map(PropertyValue::Dictionary)
                        .map_err(|e| PropertyError::Nested(Box::new(e)))
                }
                other => Err(PropertyError::wrong_type("JSON object", other)),
            },
            Self::Objects => match raw {
                Input::Object(obj) => Ok(PropertyValue::Object(Arc::clone(obj))),
                Input::Json(value @ Value::Object(_)) => {
                    let options = ParseOptions::new()
                        .with_version(ctx.spec_version)
                        .with_allow_custom(ctx.allow_custom);
                    ctx.registry
                        .parse_with(value.clone(), &options)
                        .map(|obj| PropertyValue::Object(Arc::new(obj)))
                        .map_err(|e| PropertyError::Nested(Box::new(e)))
                }
                other => Err(PropertyError::wrong_type("STIX object", other)),
            },
            Self::Json => Ok(PropertyValue::Json(raw.to_json())),
        }
    }
}

fn expect_str<'i>(raw: &'i Input, expected: &'static str) -> Result<&'i str, PropertyError> {
    match raw {
        Input::Json(Value::String(s)) => Ok(s),
        other => Err(PropertyError::wrong_type(expected, other)),
    }
}

fn check_bounds<T>(value: T, min: Option<T>, max: Option<T>) -> Result<(), PropertyError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if let Some(min) = min {
        if value < min {
            return Err(PropertyError::Invalid(format!(
                "{value} is less than the minimum {min}"
            )));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(PropertyError::Invalid(format!(
                "{value} is greater than the maximum {max}"
            )));
        }
    }
    Ok(())
}

fn coerce_bool(raw: &Input) -> Result<bool, PropertyError> {
    match raw {
        Input::Json(Value::Bool(b)) => Ok(*b),
        Input::Json(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(PropertyError::Invalid(format!("'{s}' is not a boolean"))),
        },
        Input::Json(Value::Number(n)) => match n.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(PropertyError::Invalid(format!("{n} is not a boolean"))),
        },
        other => Err(PropertyError::wrong_type("boolean", other)),
    }
}

fn validate_reference(
    rule: &ReferenceRule,
    raw: &Input,
    ctx: &ValidationContext<'_>,
) -> Result<PropertyValue, PropertyError> {
    let id = match raw {
        Input::Json(Value::String(s)) => Identifier::parse(s, ctx.strict_ids())?,
        Input::Object(obj) => obj.id().cloned().ok_or_else(|| {
            PropertyError::Invalid(format!("{} object has no id", obj.object_type()))
        })?,
        other => return Err(PropertyError::wrong_type("identifier or STIX object", other)),
    };
    rule.check(id.type_name())?;
    Ok(PropertyValue::Identifier(id))
}

fn validate_list(
    name: &str,
    inner: &PropertyKind,
    min_length: usize,
    raw: &Input,
    ctx: &ValidationContext<'_>,
) -> Result<PropertyValue, PropertyError> {
    // A lone value is a one-element list
    let items: Vec<Input> = match raw {
        Input::List(items) => items.clone(),
        Input::Json(Value::Array(values)) => values.iter().cloned().map(Input::Json).collect(),
        single => vec![single.clone()],
    };

    if items.len() < min_length {
        return Err(PropertyError::Invalid(if min_length == 1 {
            "must not be empty".to_string()
        } else {
            format!("must have at least {min_length} items")
        }));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            inner
                .validate(name, item, ctx)
                .map_err(|e| PropertyError::Item {
                    index,
                    source: Box::new(e),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(PropertyValue::List)
}

fn validate_dictionary(raw: &Input, hashes: bool) -> Result<PropertyValue, PropertyError> {
    let map = match raw {
        Input::Json(Value::Object(map)) => map,
        other => return Err(PropertyError::wrong_type("JSON object", other)),
    };
    if map.is_empty() {
        return Err(PropertyError::Invalid("must not be empty".to_string()));
    }
    for (key, value) in map {
        if key.is_empty() || key.chars().count() > MAX_KEY_LENGTH {
            return Err(PropertyError::Invalid(format!(
                "key '{key}' must be 1 to {MAX_KEY_LENGTH} characters"
            )));
        }
        if hashes && !matches!(value, Value::String(s) if !s.is_empty()) {
            return Err(PropertyError::Invalid(format!(
                "hash value for '{key}' must be a non-empty string"
            )));
        }
    }
    Ok(PropertyValue::Json(Value::Object(map.clone())))
}

/// How a missing property is filled in before validation
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Current instant, shared by all defaults of one construction
    Now,
    /// Value of `created` if supplied, else the current instant
    Created,
    /// Fixed value; omitted from serialization while defaulted
    Static(PropertyValue),
    /// Freshly generated identifier of the object's type
    GeneratedId,
    /// The schema's spec version
    SchemaVersion,
    /// The schema's type name
    TypeName,
}

/// Declaration of one property of one object type
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    kind: PropertyKind,
    required: bool,
    default: Option<DefaultValue>,
    check: Option<PropertyCheck>,
}

impl PropertyDescriptor {
    /// Create optional property without default
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            check: None,
        }
    }

    /// Mark as required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// With default
    #[inline]
    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// With custom check
    #[inline]
    #[must_use]
    pub fn with_check(mut self, check: PropertyCheck) -> Self {
        self.check = Some(check);
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Run built-in validation, then the custom check
    ///
    /// # Errors
    /// Returns error if either rejects the input
    pub fn validate(
        &self,
        raw: &Input,
        ctx: &ValidationContext<'_>,
    ) -> Result<PropertyValue, PropertyError> {
        let value = self.kind.validate(&self.name, raw, ctx)?;
        if let Some(check) = self.check {
            check(&value).map_err(PropertyError::Invalid)?;
        }
        Ok(value)
    }
}

/// Per-construction state visible to validators
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) object_type: &'a str,
    pub(crate) spec_version: &'a str,
    pub(crate) allow_custom: bool,
    pub(crate) interop: bool,
}

impl<'a> ValidationContext<'a> {
    /// Object type being constructed
    #[inline]
    #[must_use]
    pub fn object_type(&self) -> &'a str {
        self.object_type
    }

    /// Spec version being constructed
    #[inline]
    #[must_use]
    pub fn spec_version(&self) -> &'a str {
        self.spec_version
    }

    /// Whether identifiers must carry RFC 4122 UUIDs
    #[inline]
    #[must_use]
    pub fn strict_ids(&self) -> bool {
        self.spec_version == STRICT_ID_VERSION && !self.interop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use serde_json::json;

    fn registry() -> TypeRegistry {
        TypeRegistry::new(EngineConfig::default())
    }

    fn ctx(registry: &TypeRegistry) -> ValidationContext<'_> {
        ValidationContext {
            registry,
            object_type: "report",
            spec_version: "2.1",
            allow_custom: false,
            interop: false,
        }
    }

    fn json(value: Value) -> Input {
        Input::Json(value)
    }

    #[test]
    fn type_must_match_object() {
        let registry = registry();
        let ctx = ctx(&registry);
        assert!(PropertyKind::Type.validate("type", &json(json!("report")), &ctx).is_ok());
        assert!(PropertyKind::Type.validate("type", &json(json!("indicator")), &ctx).is_err());
    }

    #[test]
    fn spec_version_must_match_schema() {
        let registry = registry();
        let ctx = ctx(&registry);
        assert!(PropertyKind::SpecVersion
            .validate("spec_version", &json(json!("2.1")), &ctx)
            .is_ok());
        assert!(PropertyKind::SpecVersion
            .validate("spec_version", &json(json!("2.0")), &ctx)
            .is_err());
    }

    #[test]
    fn string_rejects_non_string() {
        let registry = registry();
        let ctx = ctx(&registry);
        let err = PropertyKind::string()
            .validate("name", &json(json!(5)), &ctx)
            .unwrap_err();
        assert!(matches!(err, PropertyError::WrongType { .. }));
    }

    #[test]
    fn non_empty_string_rejects_empty() {
        let registry = registry();
        let ctx = ctx(&registry);
        assert!(PropertyKind::non_empty_string()
            .validate("name", &json(json!("")), &ctx)
            .is_err());
    }

    #[test]
    fn integer_bounds() {
        let registry = registry();
        let ctx = ctx(&registry);
        let kind = PropertyKind::integer_range(0, 100);
        assert_eq!(
            kind.validate("confidence", &json(json!(50)), &ctx).unwrap(),
            PropertyValue::Integer(50)
        );
        assert!(kind.validate("confidence", &json(json!(101)), &ctx).is_err());
        assert!(kind.validate("confidence", &json(json!(-1)), &ctx).is_err());
        assert!(kind.validate("confidence", &json(json!(1.5)), &ctx).is_err());
    }

    #[test]
    fn float_bounds() {
        let registry = registry();
        let ctx = ctx(&registry);
        let kind = PropertyKind::float_range(Some(-90.0), Some(90.0));
        assert!(kind.validate("latitude", &json(json!(45.5)), &ctx).is_ok());
        assert!(kind.validate("latitude", &json(json!(12)), &ctx).is_ok());
        assert!(kind.validate("latitude", &json(json!(90.5)), &ctx).is_err());
    }

    #[test]
    fn boolean_coercions() {
        let registry = registry();
        let ctx = ctx(&registry);
        let cases = [
            (json!(true), true),
            (json!("true"), true),
            (json!("F"), false),
            (json!(1), true),
            (json!(0), false),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                PropertyKind::Boolean
                    .validate("revoked", &json(raw), &ctx)
                    .unwrap(),
                PropertyValue::Boolean(expected)
            );
        }
        assert!(PropertyKind::Boolean
            .validate("revoked", &json(json!("maybe")), &ctx)
            .is_err());
    }

    #[test]
    fn timestamp_parsed() {
        let registry = registry();
        let ctx = ctx(&registry);
        let value = PropertyKind::timestamp()
            .validate("published", &json(json!("2016-01-20T17:00:00Z")), &ctx)
            .unwrap();
        assert_eq!(
            value.as_timestamp().unwrap().to_string(),
            "2016-01-20T17:00:00Z"
        );
        assert!(matches!(
            PropertyKind::timestamp().validate("published", &json(json!("2016-01-20")), &ctx),
            Err(PropertyError::Timestamp(_))
        ));
    }

    #[test]
    fn closed_enum_rejects_unknown() {
        let registry = registry();
        let ctx = ctx(&registry);
        let kind = PropertyKind::Enum(&["agree", "disagree"]);
        assert!(kind.validate("opinion", &json(json!("agree")), &ctx).is_ok());
        assert!(kind.validate("opinion", &json(json!("meh")), &ctx).is_err());
    }

    #[test]
    fn open_vocab_accepts_unknown() {
        let registry = registry();
        let ctx = ctx(&registry);
        let kind = PropertyKind::OpenVocab(&["campaign", "threat-actor"]);
        assert_eq!(
            kind.validate("report_types", &json(json!("something-new")), &ctx)
                .unwrap(),
            PropertyValue::String("something-new".to_string())
        );
    }

    #[test]
    fn reference_accepts_identifier() {
        let registry = registry();
        let ctx = ctx(&registry);
        let value = PropertyKind::reference(ReferenceRule::to(&["identity"]))
            .validate(
                "created_by_ref",
                &json(json!("identity--a463ffb3-1bd9-4d94-b02d-74e4f1658283")),
                &ctx,
            )
            .unwrap();
        assert_eq!(value.as_identifier().unwrap().type_name(), "identity");
    }

    #[test]
    fn reference_takes_id_of_object_instance() {
        use crate::object::StixObject;
        use crate::value::Properties;

        let registry = registry();
        let ctx = ctx(&registry);
        let id: Identifier = "indicator--26ffb872-1dd9-446e-b6f5-d58527e5b5d2".parse().unwrap();
        let mut props = Properties::new();
        props.insert("type".into(), PropertyValue::String("indicator".into()));
        props.insert("id".into(), PropertyValue::Identifier(id.clone()));
        let indicator = StixObject::from_parts("indicator", "2.1", true, props, Vec::new());

        let kind = PropertyKind::reference(ReferenceRule::ANY);
        let value = kind
            .validate("object_refs", &Input::Object(Arc::new(indicator)), &ctx)
            .unwrap();
        assert_eq!(value.as_identifier(), Some(&id));

        let nameless = StixObject::from_parts("indicator", "2.1", true, Properties::new(), Vec::new());
        let err = kind
            .validate("object_refs", &Input::Object(Arc::new(nameless)), &ctx)
            .unwrap_err();
        assert!(matches!(err, PropertyError::Invalid(_)));
    }

    #[test]
    fn reference_enforces_valid_types() {
        let registry = registry();
        let ctx = ctx(&registry);
        let err = PropertyKind::reference(ReferenceRule::to(&["identity"]))
            .validate(
                "created_by_ref",
                &json(json!("campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c")),
                &ctx,
            )
            .unwrap_err();
        assert!(err.to_string().contains("identity"));
    }

    #[test]
    fn reference_enforces_invalid_types() {
        let registry = registry();
        let ctx = ctx(&registry);
        let rule = ReferenceRule::except(&["bundle"]);
        assert!(PropertyKind::reference(rule)
            .validate(
                "source_ref",
                &json(json!("bundle--83422c77-904c-4dc1-aff5-5c38f3a2c55c")),
                &ctx,
            )
            .is_err());
    }

    #[test]
    fn list_reports_failing_index() {
        let registry = registry();
        let ctx = ctx(&registry);
        let kind = PropertyKind::list_of(PropertyKind::reference(ReferenceRule::ANY));
        let raw = json(json!([
            "indicator--26ffb872-1dd9-446e-b6f5-d58527e5b5d2",
            "campaign-83422c77-904c-4dc1-aff5-5c38f3a2c55c"
        ]));
        let err = kind.validate("object_refs", &raw, &ctx).unwrap_err();
        assert!(matches!(err, PropertyError::Item { index: 1, .. }));
    }

    #[test]
    fn list_rejects_empty() {
        let registry = registry();
        let ctx = ctx(&registry);
        let kind = PropertyKind::list_of(PropertyKind::string());
        assert!(kind.validate("labels", &json(json!([])), &ctx).is_err());
    }

    #[test]
    fn list_wraps_single_value() {
        let registry = registry();
        let ctx = ctx(&registry);
        let kind = PropertyKind::list_of(PropertyKind::string());
        assert_eq!(
            kind.validate("labels", &json(json!("solo")), &ctx).unwrap(),
            PropertyValue::List(vec![PropertyValue::String("solo".into())])
        );
    }

    #[test]
    fn hashes_require_string_values() {
        let registry = registry();
        let ctx = ctx(&registry);
        assert!(PropertyKind::Hashes
            .validate("hashes", &json(json!({"SHA-256": "abc"})), &ctx)
            .is_ok());
        assert!(PropertyKind::Hashes
            .validate("hashes", &json(json!({"SHA-256": 5})), &ctx)
            .is_err());
        assert!(PropertyKind::Dictionary
            .validate("definition", &json(json!({})), &ctx)
            .is_err());
    }

    #[test]
    fn descriptor_runs_custom_check() {
        fn lowercase(value: &PropertyValue) -> Result<(), String> {
            match value.as_str() {
                Some(s) if s == s.to_lowercase() => Ok(()),
                _ => Err("must be lowercase".to_string()),
            }
        }

        let registry = registry();
        let ctx = ctx(&registry);
        let descriptor =
            PropertyDescriptor::new("relationship_type", PropertyKind::string()).with_check(lowercase);
        assert!(descriptor.validate(&json(json!("uses")), &ctx).is_ok());
        assert_eq!(
            descriptor.validate(&json(json!("Uses")), &ctx).unwrap_err(),
            PropertyError::Invalid("must be lowercase".to_string())
        );
    }

    #[test]
    fn strict_ids_only_for_21() {
        let registry = registry();
        let mut ctx = ctx(&registry);
        assert!(ctx.strict_ids());
        ctx.interop = true;
        assert!(!ctx.strict_ids());
        ctx.interop = false;
        ctx.spec_version = "2.0";
        assert!(!ctx.strict_ids());
    }
}
