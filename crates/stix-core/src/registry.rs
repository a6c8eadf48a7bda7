//! Type registry
//!
//! Maps `(spec_version, type_name)` to an [`ObjectSchema`]. The registry is
//! read-mostly: schemas are registered once at load time (plus the odd
//! custom type later) and looked up on every construction. Lookups clone
//! the `Arc` and release the lock before any validation runs.

use crate::config::{EngineConfig, ParseOptions};
use crate::construct;
use crate::error::{Result, StixError};
use crate::object::StixObject;
use crate::property::ValidationContext;
use crate::schema::{ObjectSchema, SchemaKey, SUPPORTED_VERSIONS};
use crate::value::Inputs;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of object schemas
///
/// # Example
/// ```rust,ignore
/// let registry = TypeRegistry::new(EngineConfig::default());
/// stix_catalog::load_builtin(&registry)?;
/// let report = registry.parse(json_text, None)?;
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    config: EngineConfig,
    schemas: RwLock<HashMap<SchemaKey, Arc<ObjectSchema>>>,
}

impl TypeRegistry {
    /// Create empty registry
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a schema
    ///
    /// # Errors
    /// - [`StixError::InvalidRegistration`] if the schema is malformed
    /// - [`StixError::DuplicateRegistration`] if the key is already taken
    pub fn register(&self, schema: ObjectSchema) -> Result<Arc<ObjectSchema>> {
        schema.check_definition()?;
        let key = schema.key();

        let mut schemas = self.schemas.write();
        if schemas.contains_key(&key) {
            return Err(StixError::DuplicateRegistration {
                type_name: key.type_name,
                spec_version: key.spec_version,
            });
        }

        let schema = Arc::new(schema);
        schemas.insert(key, Arc::clone(&schema));
        drop(schemas);

        tracing::debug!(
            type_name = schema.type_name(),
            spec_version = schema.spec_version(),
            "registered schema"
        );
        Ok(schema)
    }

    /// Remove a schema, returning it if present
    pub fn unregister(&self, type_name: &str, spec_version: &str) -> Option<Arc<ObjectSchema>> {
        let removed = self
            .schemas
            .write()
            .remove(&SchemaKey::new(spec_version, type_name));
        if removed.is_some() {
            tracing::debug!(type_name, spec_version, "unregistered schema");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, type_name: &str, spec_version: &str) -> Option<Arc<ObjectSchema>> {
        self.schemas
            .read()
            .get(&SchemaKey::new(spec_version, type_name))
            .cloned()
    }

    #[must_use]
    pub fn contains(&self, type_name: &str, spec_version: &str) -> bool {
        self.schemas
            .read()
            .contains_key(&SchemaKey::new(spec_version, type_name))
    }

    /// Spec versions a type is registered under, sorted
    #[must_use]
    pub fn versions(&self, type_name: &str) -> Vec<String> {
        let mut versions: Vec<String> = self
            .schemas
            .read()
            .keys()
            .filter(|key| key.type_name == type_name)
            .map(|key| key.spec_version.clone())
            .collect();
        versions.sort();
        versions
    }

    /// Type names registered for a spec version, sorted
    #[must_use]
    pub fn type_names(&self, spec_version: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .read()
            .keys()
            .filter(|key| key.spec_version == spec_version)
            .map(|key| key.type_name.clone())
            .collect();
        names.sort();
        names
    }

    /// Whether the engine can validate objects of this spec version
    #[inline]
    #[must_use]
    pub fn supports_version(&self, spec_version: &str) -> bool {
        SUPPORTED_VERSIONS.contains(&spec_version)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Construct a registered type
    ///
    /// `version` defaults to the configured spec version.
    ///
    /// # Errors
    /// Returns [`StixError::UnsupportedVersion`], [`StixError::UnknownType`],
    /// or the first validation error
    pub fn construct(
        &self,
        type_name: &str,
        version: Option<&str>,
        inputs: Inputs,
    ) -> Result<StixObject> {
        let options = ParseOptions {
            version: version.map(str::to_string),
            allow_custom: None,
        };
        self.construct_with(type_name, inputs, &options)
    }

    /// Construct a registered type with per-call options
    ///
    /// # Errors
    /// Same as [`construct`](Self::construct)
    pub fn construct_with(
        &self,
        type_name: &str,
        inputs: Inputs,
        options: &ParseOptions,
    ) -> Result<StixObject> {
        let version = self.effective_version(options.version.as_deref());
        let schema = self.resolve(type_name, version)?;
        let ctx = self.context(&schema, self.effective_allow_custom(options));
        construct::build_object(&schema, inputs, &ctx)
    }

    /// Validate inputs without building, returning every error found
    #[must_use]
    pub fn check(&self, type_name: &str, version: Option<&str>, inputs: Inputs) -> Vec<StixError> {
        self.check_with(type_name, inputs, &ParseOptions {
            version: version.map(str::to_string),
            allow_custom: None,
        })
    }

    /// [`check`](Self::check) with per-call options
    #[must_use]
    pub fn check_with(
        &self,
        type_name: &str,
        inputs: Inputs,
        options: &ParseOptions,
    ) -> Vec<StixError> {
        let version = self.effective_version(options.version.as_deref());
        match self.resolve(type_name, version) {
            Ok(schema) => {
                let ctx = self.context(&schema, self.effective_allow_custom(options));
                construct::check_object(&schema, inputs, &ctx)
            }
            Err(e) => vec![e],
        }
    }

    pub(crate) fn effective_version<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(self.config.default_spec_version.as_str())
    }

    pub(crate) fn effective_allow_custom(&self, options: &ParseOptions) -> bool {
        options.allow_custom.unwrap_or(self.config.allow_custom)
    }

    /// Look up a schema, distinguishing unknown versions from unknown types
    pub(crate) fn resolve(&self, type_name: &str, spec_version: &str) -> Result<Arc<ObjectSchema>> {
        if !self.supports_version(spec_version) {
            return Err(StixError::UnsupportedVersion {
                version: spec_version.to_string(),
            });
        }
        self.get(type_name, spec_version)
            .ok_or_else(|| StixError::UnknownType {
                type_name: type_name.to_string(),
                spec_version: spec_version.to_string(),
            })
    }

    pub(crate) fn context<'a>(
        &'a self,
        schema: &'a ObjectSchema,
        allow_custom: bool,
    ) -> ValidationContext<'a> {
        ValidationContext {
            registry: self,
            object_type: schema.type_name(),
            spec_version: schema.spec_version(),
            allow_custom,
            interop: self.config.interop,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
