//! Error types for the STIX engine
//!
//! Every failure that can escape construction or parsing is a [`StixError`].
//! Validation failures always carry the owning object type and, where one
//! exists, the offending property name so callers can attribute them
//! precisely:
//!
//! ```rust,ignore
//! match err {
//!     StixError::InvalidValue { object_type, prop_name, .. } => { /* ... */ }
//!     _ => {}
//! }
//! assert_eq!(err.prop_name(), Some("object_refs"));
//! ```

use crate::identifier::IdentifierError;

/// Main error type for object construction, parsing and registration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StixError {
    /// Identifier does not have the `<type>--<uuid>` shape, or its type
    /// prefix does not match the object it names
    #[error("malformed id '{id}' for {object_type}: {reason}")]
    MalformedId {
        object_type: String,
        id: String,
        #[source]
        reason: IdentifierError,
    },

    /// Required properties absent after defaulting
    #[error("no values for required properties of {object_type}: {}", .properties.join(", "))]
    MissingProperties {
        object_type: String,
        properties: Vec<String>,
    },

    /// Property present but rejected by its descriptor
    #[error("invalid value for {object_type} '{prop_name}': {reason}")]
    InvalidValue {
        object_type: String,
        prop_name: String,
        reason: String,
    },

    /// Properties not declared by the schema (custom content not allowed)
    #[error("unexpected properties for {object_type}: {}", .properties.join(", "))]
    ExtraProperties {
        object_type: String,
        properties: Vec<String>,
    },

    /// None of a group of properties is populated
    #[error("at least one of ({}) must be populated for {object_type}", .properties.join(", "))]
    AtLeastOneProperty {
        object_type: String,
        properties: Vec<String>,
    },

    /// More than one of a group of exclusive properties is populated
    #[error("properties ({}) of {object_type} are mutually exclusive", .properties.join(", "))]
    MutuallyExclusiveProperties {
        object_type: String,
        properties: Vec<String>,
    },

    /// Properties present without the properties they depend on
    #[error("dependent properties of {object_type} are missing: {}", format_dependencies(.dependencies))]
    DependentProperties {
        object_type: String,
        /// `(dependent, dependency)` pairs
        dependencies: Vec<(String, String)>,
    },

    /// No schema registered and no fallback applies
    #[error("no schema registered for type '{type_name}' in spec version {spec_version}")]
    UnknownType {
        type_name: String,
        spec_version: String,
    },

    /// Top-level input has no usable `type`
    #[error("can't parse object without a type: {reason}")]
    MissingType { reason: String },

    /// Top-level input is not a JSON object
    #[error("invalid JSON input: {message}")]
    InvalidJson { message: String },

    /// Spec version not known to the registry
    #[error("unsupported spec version '{version}'")]
    UnsupportedVersion { version: String },

    /// Attempt to change properties fixed at construction
    #[error("cannot modify properties of {object_type}: {}", .properties.join(", "))]
    Immutable {
        object_type: String,
        properties: Vec<String>,
    },

    /// Attempt to version a revoked object
    #[error("cannot create a new version of revoked {object_type} '{id}'")]
    Revoked { object_type: String, id: String },

    /// Schema key already registered
    #[error("type '{type_name}' is already registered for spec version {spec_version}")]
    DuplicateRegistration {
        type_name: String,
        spec_version: String,
    },

    /// Schema rejected at registration time
    #[error("invalid registration for '{type_name}': {reason}")]
    InvalidRegistration { type_name: String, reason: String },
}

/// Discriminant of [`StixError`], for matching without destructuring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedId,
    MissingProperties,
    InvalidValue,
    ExtraProperties,
    AtLeastOneProperty,
    MutuallyExclusiveProperties,
    DependentProperties,
    UnknownType,
    MissingType,
    InvalidJson,
    UnsupportedVersion,
    Immutable,
    Revoked,
    DuplicateRegistration,
    InvalidRegistration,
}

impl StixError {
    /// Create invalid value error
    pub fn invalid_value(
        object_type: impl Into<String>,
        prop_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            object_type: object_type.into(),
            prop_name: prop_name.into(),
            reason: reason.into(),
        }
    }

    /// Create malformed id error
    pub fn malformed_id(
        object_type: impl Into<String>,
        id: impl Into<String>,
        reason: IdentifierError,
    ) -> Self {
        Self::MalformedId {
            object_type: object_type.into(),
            id: id.into(),
            reason,
        }
    }

    /// Error kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedId { .. } => ErrorKind::MalformedId,
            Self::MissingProperties { .. } => ErrorKind::MissingProperties,
            Self::InvalidValue { .. } => ErrorKind::InvalidValue,
            Self::ExtraProperties { .. } => ErrorKind::ExtraProperties,
            Self::AtLeastOneProperty { .. } => ErrorKind::AtLeastOneProperty,
            Self::MutuallyExclusiveProperties { .. } => ErrorKind::MutuallyExclusiveProperties,
            Self::DependentProperties { .. } => ErrorKind::DependentProperties,
            Self::UnknownType { .. } => ErrorKind::UnknownType,
            Self::MissingType { .. } => ErrorKind::MissingType,
            Self::InvalidJson { .. } => ErrorKind::InvalidJson,
            Self::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            Self::Immutable { .. } => ErrorKind::Immutable,
            Self::Revoked { .. } => ErrorKind::Revoked,
            Self::DuplicateRegistration { .. } => ErrorKind::DuplicateRegistration,
            Self::InvalidRegistration { .. } => ErrorKind::InvalidRegistration,
        }
    }

    /// Object type the error is attributed to, if any
    #[must_use]
    pub fn object_type(&self) -> Option<&str> {
        match self {
            Self::MalformedId { object_type, .. }
            | Self::MissingProperties { object_type, .. }
            | Self::InvalidValue { object_type, .. }
            | Self::ExtraProperties { object_type, .. }
            | Self::AtLeastOneProperty { object_type, .. }
            | Self::MutuallyExclusiveProperties { object_type, .. }
            | Self::DependentProperties { object_type, .. }
            | Self::Immutable { object_type, .. }
            | Self::Revoked { object_type, .. } => Some(object_type),
            Self::UnknownType { type_name, .. }
            | Self::DuplicateRegistration { type_name, .. }
            | Self::InvalidRegistration { type_name, .. } => Some(type_name),
            Self::MissingType { .. } | Self::InvalidJson { .. } | Self::UnsupportedVersion { .. } => {
                None
            }
        }
    }

    /// Single property the error is attributed to, if any
    ///
    /// Errors naming several properties (missing, extra, exclusive, ...)
    /// return `None`; inspect the variant for the full list.
    #[must_use]
    pub fn prop_name(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { prop_name, .. } => Some(prop_name),
            Self::MalformedId { .. } => Some("id"),
            _ => None,
        }
    }
}

fn format_dependencies(dependencies: &[(String, String)]) -> String {
    dependencies
        .iter()
        .map(|(dependent, on)| format!("'{dependent}' requires '{on}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, StixError>;
