//! STIX Catalog
//!
//! Declarative schema tables for the built-in STIX 2.0 and 2.1 object
//! types, plus a process-wide [`TypeRegistry`] loaded with them.
//!
//! # Example
//!
//! ```rust,ignore
//! let indicator = stix_catalog::parse(r#"{"type": "indicator", ...}"#, None)?;
//! assert_eq!(indicator.spec_version(), "2.1");
//!
//! let schema = stix_catalog::custom_object(
//!     "x-animal",
//!     "2.1",
//!     vec![PropertyDescriptor::new("species", PropertyKind::string()).required()],
//! )?;
//! stix_catalog::register_custom_object(schema)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod common;
pub mod markings;
mod v20;
mod v21;
pub mod vocab;

pub use markings::TlpLevel;

use once_cell::sync::Lazy;
use stix_core::{
    custom_schema, EngineConfig, Identifier, Inputs, ObjectBuilder, ObjectSchema, ParseInput,
    PropertyDescriptor, Result, StixObject, TypeRegistry,
};
use std::sync::Arc;

static REGISTRY: Lazy<TypeRegistry> = Lazy::new(|| {
    let registry = TypeRegistry::new(EngineConfig::default());
    match load_builtin(&registry) {
        Ok(count) => tracing::debug!(count, "Loaded built-in STIX schemas"),
        Err(e) => tracing::warn!(error = %e, "Failed to load built-in STIX schemas"),
    }
    registry
});

/// Register every built-in schema, returning how many were added
///
/// # Errors
/// Returns [`stix_core::StixError::DuplicateRegistration`] if a schema is
/// already registered
pub fn load_builtin(registry: &TypeRegistry) -> Result<usize> {
    let mut count = 0;
    for schema in v21::schemas().into_iter().chain(v20::schemas()) {
        registry.register(schema)?;
        count += 1;
    }
    Ok(count)
}

/// Fresh registry with the built-in schemas loaded
///
/// # Errors
/// Same as [`load_builtin`]
pub fn builtin_registry(config: EngineConfig) -> Result<TypeRegistry> {
    let registry = TypeRegistry::new(config);
    load_builtin(&registry)?;
    Ok(registry)
}

/// Process-wide registry
pub fn registry() -> &'static TypeRegistry {
    &REGISTRY
}

/// Parse with the process-wide registry
///
/// # Errors
/// See [`TypeRegistry::parse`]
pub fn parse<'a>(raw: impl Into<ParseInput<'a>>, version: Option<&str>) -> Result<StixObject> {
    registry().parse(raw, version)
}

/// Construct with the process-wide registry
///
/// # Errors
/// See [`TypeRegistry::construct`]
pub fn construct(type_name: &str, version: Option<&str>, inputs: Inputs) -> Result<StixObject> {
    registry().construct(type_name, version, inputs)
}

/// Custom object schema framed by the common properties of `version`
///
/// # Errors
/// Returns [`stix_core::StixError::InvalidRegistration`] for a bad type or
/// property name, or a property that shadows a common one
pub fn custom_object(
    type_name: &str,
    version: &str,
    properties: Vec<PropertyDescriptor>,
) -> Result<ObjectSchema> {
    custom_schema(
        type_name,
        version,
        common::header(version),
        properties,
        common::trailer(version),
    )
}

/// Register a custom schema with the process-wide registry
///
/// # Errors
/// Returns [`stix_core::StixError::InvalidRegistration`] for a malformed
/// schema, or [`stix_core::StixError::DuplicateRegistration`] if the type is
/// already registered for its version
pub fn register_custom_object(schema: ObjectSchema) -> Result<Arc<ObjectSchema>> {
    registry().register(schema)
}

/// Builder for a relationship between two objects
pub fn relationship(source: &Identifier, relationship_type: &str, target: &Identifier) -> ObjectBuilder {
    ObjectBuilder::new("relationship")
        .property("source_ref", source)
        .property("relationship_type", relationship_type)
        .property("target_ref", target)
}

/// Builder for a sighting of an object
pub fn sighting(sighting_of: &Identifier) -> ObjectBuilder {
    ObjectBuilder::new("sighting").property("sighting_of_ref", sighting_of)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
