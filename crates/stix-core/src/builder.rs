//! Fluent object construction

use crate::config::ParseOptions;
use crate::error::{Result, StixError};
use crate::object::StixObject;
use crate::registry::TypeRegistry;
use crate::value::{Input, Inputs};

/// Collects properties, then constructs through a registry
///
/// # Example
/// ```rust,ignore
/// let indicator = ObjectBuilder::new("indicator")
///     .property("pattern_type", "stix")
///     .property("pattern", "[file:hashes.MD5 = 'd41d8cd98f00b204e9800998ecf8427e']")
///     .property("valid_from", "2017-01-01T12:34:56Z")
///     .build(&registry)?;
/// ```
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    type_name: String,
    options: ParseOptions,
    inputs: Inputs,
}

impl ObjectBuilder {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            options: ParseOptions::default(),
            inputs: Inputs::new(),
        }
    }

    /// Spec version to construct (defaults to the registry's)
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.options.version = Some(version.into());
        self
    }

    /// Keep undeclared properties
    #[must_use]
    pub fn allow_custom(mut self, allow: bool) -> Self {
        self.options.allow_custom = Some(allow);
        self
    }

    /// Set one property; a later call for the same name replaces it
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<Input>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Input>,
    {
        self.inputs
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Construct the object
    ///
    /// # Errors
    /// Returns the first construction error
    pub fn build(self, registry: &TypeRegistry) -> Result<StixObject> {
        registry.construct_with(&self.type_name, self.inputs, &self.options)
    }

    /// Validate without building
    #[must_use]
    pub fn check(self, registry: &TypeRegistry) -> Vec<StixError> {
        registry.check_with(&self.type_name, self.inputs, &self.options)
    }
}
