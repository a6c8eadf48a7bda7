//! STIX Object Engine
//!
//! Typed, validated STIX 2.0 / 2.1 objects with canonical JSON
//! serialization.
//!
//! # Core Concepts
//!
//! - [`PropertyDescriptor`]: declares one field (kind, required-ness, default, check)
//! - [`ObjectSchema`]: ordered descriptors of one `(spec_version, type)` pair
//! - [`TypeRegistry`]: schema lookup, construction and parse dispatch
//! - [`StixObject`]: immutable validated object; changes go through [`StixObject::new_version`]
//! - [`Identifier`] / [`Timestamp`]: the two value types every object carries
//!
//! # Example
//!
//! ```rust,ignore
//! use stix_core::{EngineConfig, TypeRegistry};
//!
//! let registry = TypeRegistry::new(EngineConfig::default());
//! stix_catalog::load_builtin(&registry)?;
//!
//! let report = registry.parse(json_text, None)?;
//! println!("{report}");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod builder;
mod config;
mod construct;
mod custom;
mod error;
mod identifier;
mod object;
mod parse;
mod property;
mod registry;
mod schema;
mod serialize;
mod timestamp;
mod value;
mod versioning;

// Re-exports
pub use builder::ObjectBuilder;
pub use config::{EngineConfig, ParseOptions, DEFAULT_SPEC_VERSION};
pub use custom::custom_schema;
pub use error::{ErrorKind, Result, StixError};
pub use identifier::{is_valid_type_name, new_id, validate_id, Identifier, IdentifierError, SEPARATOR};
pub use object::StixObject;
pub use parse::ParseInput;
pub use property::{
    DefaultValue, PropertyCheck, PropertyDescriptor, PropertyError, PropertyKind, ReferenceRule,
    ValidationContext,
};
pub use registry::TypeRegistry;
pub use schema::{
    check_property_name, check_type_name, ObjectCategory, ObjectConstraint, ObjectSchema,
    SchemaKey, MAX_NAME_LENGTH, MIN_NAME_LENGTH, SUPPORTED_VERSIONS,
};
pub use timestamp::{Precision, PrecisionConstraint, Timestamp, TimestampError};
pub use value::{Input, Inputs, Properties, PropertyValue};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        DefaultValue, EngineConfig, Identifier, Input, Inputs, ObjectBuilder, ObjectCategory,
        ObjectConstraint, ObjectSchema, PropertyDescriptor, PropertyKind, PropertyValue,
        ReferenceRule, StixError, StixObject, Timestamp, TypeRegistry,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
