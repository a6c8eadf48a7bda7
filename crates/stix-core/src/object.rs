//! Validated STIX objects
//!
//! A [`StixObject`] only comes out of the constructor, so every value held
//! satisfies its schema. There are no setters; see
//! [`StixObject::new_version`] for copy-on-write changes.

use crate::identifier::Identifier;
use crate::timestamp::Timestamp;
use crate::value::{Properties, PropertyValue};

/// Immutable, validated STIX object
#[derive(Debug, Clone, PartialEq)]
pub struct StixObject {
    object_type: String,
    spec_version: String,
    registered: bool,
    properties: Properties,
    defaulted: Vec<String>,
}

impl StixObject {
    pub(crate) fn from_parts(
        object_type: impl Into<String>,
        spec_version: impl Into<String>,
        registered: bool,
        properties: Properties,
        defaulted: Vec<String>,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            spec_version: spec_version.into(),
            registered,
            properties,
            defaulted,
        }
    }

    /// Object type (`type` property)
    #[inline]
    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Spec version the object was validated against
    ///
    /// STIX 2.0 objects report "2.0" here even though they do not carry a
    /// `spec_version` property.
    #[inline]
    #[must_use]
    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    /// Whether a registered schema validated this object
    ///
    /// `false` for the passthrough representation of unknown types.
    #[inline]
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_str)
    }

    #[must_use]
    pub fn timestamp(&self, name: &str) -> Option<&Timestamp> {
        self.get(name).and_then(PropertyValue::as_timestamp)
    }

    #[must_use]
    pub fn identifier(&self, name: &str) -> Option<&Identifier> {
        self.get(name).and_then(PropertyValue::as_identifier)
    }

    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[PropertyValue]> {
        self.get(name).and_then(PropertyValue::as_list)
    }

    /// Identifiers held by a list-of-references property
    #[must_use]
    pub fn references(&self, name: &str) -> Vec<&Identifier> {
        self.list(name)
            .map(|items| items.iter().filter_map(PropertyValue::as_identifier).collect())
            .unwrap_or_default()
    }

    /// The object's own identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&Identifier> {
        self.identifier("id")
    }

    #[inline]
    #[must_use]
    pub fn created(&self) -> Option<&Timestamp> {
        self.timestamp("created")
    }

    #[inline]
    #[must_use]
    pub fn modified(&self) -> Option<&Timestamp> {
        self.timestamp("modified")
    }

    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.get("revoked")
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    }

    /// Whether the property only holds its static default
    #[must_use]
    pub fn is_defaulted(&self, name: &str) -> bool {
        self.defaulted.iter().any(|d| d == name)
    }

    /// Properties in canonical order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Properties that would appear in serialized output
    pub fn serialized_properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties().filter(|(name, _)| !self.is_defaulted(name))
    }

    pub(crate) fn defaulted(&self) -> &[String] {
        &self.defaulted
    }
}
