//! Copy-on-write versioning
//!
//! Objects never change in place. A new version is a fresh construction
//! from the old properties plus the changes, with `modified` moved forward.

use crate::config::ParseOptions;
use crate::error::{Result, StixError};
use crate::object::StixObject;
use crate::registry::TypeRegistry;
use crate::timestamp::{Precision, PrecisionConstraint, Timestamp};
use crate::value::{Input, Inputs};
use chrono::{Duration, Utc};

/// Properties fixed for the lifetime of an object
const IMMUTABLE_PROPERTIES: &[&str] = &["type", "spec_version", "id", "created", "created_by_ref"];

impl StixObject {
    /// Create a new version with `changes` applied
    ///
    /// A JSON `null` change removes the property. `modified` is set to the
    /// current time, and never to a time at or before the previous value.
    ///
    /// # Errors
    /// - [`StixError::UnknownType`] for unregistered objects
    /// - [`StixError::Revoked`] if this object is revoked
    /// - [`StixError::Immutable`] if a change touches a fixed property
    /// - [`StixError::InvalidValue`] on `modified` if the type cannot be
    ///   versioned or an explicit `modified` is not later
    /// - any construction error of the new version
    pub fn new_version(&self, registry: &TypeRegistry, changes: Inputs) -> Result<StixObject> {
        let object_type = self.object_type();
        let schema = registry
            .get(object_type, self.spec_version())
            .filter(|_| self.is_registered())
            .ok_or_else(|| StixError::UnknownType {
                type_name: object_type.to_string(),
                spec_version: self.spec_version().to_string(),
            })?;

        if self.is_revoked() {
            return Err(StixError::Revoked {
                object_type: object_type.to_string(),
                id: self.id().map(ToString::to_string).unwrap_or_default(),
            });
        }

        let previous = match (schema.declares("modified"), self.modified()) {
            (true, Some(modified)) => *modified,
            _ => {
                return Err(StixError::invalid_value(
                    object_type,
                    "modified",
                    format!("{object_type} objects cannot be versioned"),
                ))
            }
        };

        let fixed: Vec<String> = changes
            .keys()
            .filter(|name| IMMUTABLE_PROPERTIES.contains(&name.as_str()))
            .cloned()
            .collect();
        if !fixed.is_empty() {
            return Err(StixError::Immutable {
                object_type: object_type.to_string(),
                properties: fixed,
            });
        }

        let has_custom = self.properties().any(|(name, _)| !schema.declares(name));
        let explicit_modified = changes.get("modified").is_some_and(|m| !m.is_null());

        let mut inputs: Inputs = self
            .properties()
            .filter(|(name, _)| !self.is_defaulted(name))
            .map(|(name, value)| (name.to_string(), Input::from(value)))
            .collect();
        for (name, change) in changes {
            if change.is_null() {
                inputs.shift_remove(&name);
            } else {
                inputs.insert(name, change);
            }
        }

        if !explicit_modified {
            let floor = *previous.as_datetime() + Duration::milliseconds(1);
            let bumped = Utc::now().max(floor);
            inputs.insert(
                "modified".to_string(),
                Input::from(Timestamp::from_datetime(
                    bumped,
                    Precision::Millisecond,
                    PrecisionConstraint::Min,
                )),
            );
        }

        let options = ParseOptions::new()
            .with_version(self.spec_version())
            .with_allow_custom(has_custom || registry.config().allow_custom);
        let next = registry.construct_with(object_type, inputs, &options)?;

        if let Some(modified) = next.modified() {
            if !modified.is_after(&previous) {
                return Err(StixError::invalid_value(
                    object_type,
                    "modified",
                    format!(
                        "modified {modified} must be later than the previous version's {previous}"
                    ),
                ));
            }
        }

        tracing::debug!(
            object_type,
            id = %next.id().map(ToString::to_string).unwrap_or_default(),
            "created new object version"
        );
        Ok(next)
    }

    /// New version with `revoked` set
    ///
    /// # Errors
    /// Same as [`new_version`](Self::new_version)
    pub fn revoke(&self, registry: &TypeRegistry) -> Result<StixObject> {
        let mut changes = Inputs::new();
        changes.insert("revoked".to_string(), Input::from(true));
        self.new_version(registry, changes)
    }
}
