//! Object schemas
//!
//! An [`ObjectSchema`] is the ordered descriptor set of one
//! `(spec_version, type_name)` pair plus its cross-field constraints. The
//! declared order is also the canonical serialization order.

use crate::error::{Result, StixError};
use crate::identifier::is_valid_type_name;
use crate::property::{PropertyDescriptor, PropertyKind};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};

/// Spec versions the engine knows how to validate
pub const SUPPORTED_VERSIONS: &[&str] = &["2.0", "2.1"];

/// Shortest allowed type or property name
pub const MIN_NAME_LENGTH: usize = 3;
/// Longest allowed type or property name
pub const MAX_NAME_LENGTH: usize = 250;

static PROPERTY_NAME_21: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]{3,250}$").expect("property name pattern is valid"));

static PROPERTY_NAME_20: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,250}$").expect("property name pattern is valid"));

/// Role of an object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    /// STIX Domain Object
    Domain,
    /// STIX Relationship Object
    Relationship,
    /// Marking definitions and other meta objects
    Meta,
    /// Bundle container
    Bundle,
    /// Sub-object that only appears inside another object
    Embedded,
    /// Registered by the caller at runtime
    Custom,
}

/// Registry key of a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaKey {
    /// Spec version the schema belongs to
    pub spec_version: String,
    /// Object type name
    pub type_name: String,
}

impl SchemaKey {
    /// Key for `type_name` under `spec_version`
    #[inline]
    #[must_use]
    pub fn new(spec_version: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            spec_version: spec_version.into(),
            type_name: type_name.into(),
        }
    }
}

impl Display for SchemaKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.type_name, self.spec_version)
    }
}

/// Cross-field rule checked after every property validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectConstraint {
    /// At least one of the properties must be present
    AtLeastOne(Vec<String>),
    /// At most one of the properties may be present
    MutuallyExclusive(Vec<String>),
    /// `dependent` may only be present together with `on`
    Dependency {
        /// Property that needs the other
        dependent: String,
        /// Property it depends on
        on: String,
    },
    /// Timestamp `later` must not precede `earlier` (or equal it, if strict)
    TimestampOrder {
        /// Property holding the earlier instant
        earlier: String,
        /// Property holding the later instant
        later: String,
        /// Reject equal instants too
        strict: bool,
    },
}

impl ObjectConstraint {
    /// One of `properties` must be present
    #[must_use]
    pub fn at_least_one<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AtLeastOne(properties.into_iter().map(Into::into).collect())
    }

    /// No more than one of `properties` may be present
    #[must_use]
    pub fn mutually_exclusive<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MutuallyExclusive(properties.into_iter().map(Into::into).collect())
    }

    /// `dependent` requires `on`
    #[must_use]
    pub fn dependency(dependent: impl Into<String>, on: impl Into<String>) -> Self {
        Self::Dependency {
            dependent: dependent.into(),
            on: on.into(),
        }
    }

    /// `later` must be strictly after `earlier`
    #[must_use]
    pub fn later_than(later: impl Into<String>, earlier: impl Into<String>) -> Self {
        Self::TimestampOrder {
            earlier: earlier.into(),
            later: later.into(),
            strict: true,
        }
    }

    /// `later` must be at or after `earlier`
    #[must_use]
    pub fn not_before(later: impl Into<String>, earlier: impl Into<String>) -> Self {
        Self::TimestampOrder {
            earlier: earlier.into(),
            later: later.into(),
            strict: false,
        }
    }

    fn property_names(&self) -> Vec<&str> {
        match self {
            Self::AtLeastOne(props) | Self::MutuallyExclusive(props) => {
                props.iter().map(String::as_str).collect()
            }
            Self::Dependency { dependent, on } => vec![dependent, on],
            Self::TimestampOrder { earlier, later, .. } => vec![earlier, later],
        }
    }
}

/// Ordered property descriptors of one object type in one spec version
///
/// # Example
/// ```rust,ignore
/// let schema = ObjectSchema::new("x-widget", "2.1", ObjectCategory::Custom)
///     .with_property(PropertyDescriptor::new("type", PropertyKind::Type).required())
///     .with_property(PropertyDescriptor::new("id", PropertyKind::Id).required())
///     .with_property(PropertyDescriptor::new("foo", PropertyKind::string()));
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    type_name: String,
    spec_version: String,
    category: ObjectCategory,
    properties: IndexMap<String, PropertyDescriptor>,
    constraints: Vec<ObjectConstraint>,
}

impl ObjectSchema {
    /// Create empty schema
    #[must_use]
    pub fn new(
        type_name: impl Into<String>,
        spec_version: impl Into<String>,
        category: ObjectCategory,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            spec_version: spec_version.into(),
            category,
            properties: IndexMap::new(),
            constraints: Vec::new(),
        }
    }

    /// Append a property; redeclaring a name replaces it in place
    #[must_use]
    pub fn with_property(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties
            .insert(descriptor.name().to_string(), descriptor);
        self
    }

    /// Append several properties in order
    #[must_use]
    pub fn with_properties(
        mut self,
        descriptors: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> Self {
        for descriptor in descriptors {
            self = self.with_property(descriptor);
        }
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: ObjectConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    #[must_use]
    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    #[inline]
    #[must_use]
    pub fn category(&self) -> ObjectCategory {
        self.category
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> SchemaKey {
        SchemaKey::new(&self.spec_version, &self.type_name)
    }

    /// Descriptors in declared order
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    #[inline]
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    #[inline]
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Names of required properties, in declared order
    pub fn required_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .values()
            .filter(|d| d.is_required())
            .map(PropertyDescriptor::name)
    }

    #[inline]
    #[must_use]
    pub fn constraints(&self) -> &[ObjectConstraint] {
        &self.constraints
    }

    /// Check the schema is registrable
    ///
    /// # Errors
    /// Returns [`StixError::InvalidRegistration`] on a bad type name, an
    /// unknown spec version, a missing header property, or a constraint
    /// naming an undeclared property
    pub fn check_definition(&self) -> Result<()> {
        check_type_name(&self.type_name)?;

        if !SUPPORTED_VERSIONS.contains(&self.spec_version.as_str()) {
            return Err(self.invalid(format!(
                "unsupported spec version '{}'",
                self.spec_version
            )));
        }

        if self.category != ObjectCategory::Embedded {
            for (name, expected) in [("type", "Type"), ("id", "Id")] {
                match self.properties.get(name).map(PropertyDescriptor::kind) {
                    Some(PropertyKind::Type) if name == "type" => {}
                    Some(PropertyKind::Id) if name == "id" => {}
                    _ => {
                        return Err(self.invalid(format!(
                            "property '{name}' must be declared with kind {expected}"
                        )))
                    }
                }
            }
        }

        for constraint in &self.constraints {
            if let Some(name) = constraint
                .property_names()
                .into_iter()
                .find(|name| !self.declares(name))
            {
                return Err(self.invalid(format!(
                    "constraint refers to undeclared property '{name}'"
                )));
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> StixError {
        StixError::InvalidRegistration {
            type_name: self.type_name.clone(),
            reason,
        }
    }
}

/// Check a type name for registration (pattern and 3 to 250 characters)
///
/// # Errors
/// Returns [`StixError::InvalidRegistration`] describing the violation
pub fn check_type_name(type_name: &str) -> Result<()> {
    let invalid = |reason: &str| StixError::InvalidRegistration {
        type_name: type_name.to_string(),
        reason: reason.to_string(),
    };
    if !is_valid_type_name(type_name) {
        return Err(invalid(
            "type names must be lowercase alphanumerics separated by single hyphens",
        ));
    }
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&type_name.len()) {
        return Err(invalid("type names must be 3 to 250 characters"));
    }
    Ok(())
}

/// Check a caller-defined property name for the given spec version
///
/// # Errors
/// Returns [`StixError::InvalidRegistration`] naming the property
pub fn check_property_name(type_name: &str, spec_version: &str, name: &str) -> Result<()> {
    let pattern = if spec_version == "2.0" {
        &PROPERTY_NAME_20
    } else {
        &PROPERTY_NAME_21
    };
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(StixError::InvalidRegistration {
            type_name: type_name.to_string(),
            reason: format!(
                "property name '{name}' must be 3 to 250 characters of {}",
                if spec_version == "2.0" {
                    "letters, digits and underscores"
                } else {
                    "lowercase letters, digits and underscores"
                }
            ),
        })
    }
}
