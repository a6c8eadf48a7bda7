//! Custom content
//!
//! Two ways to handle types the catalog does not know: register a schema
//! built with [`custom_schema`], or let the parse dispatcher keep the object
//! as an unregistered passthrough that preserves every field verbatim.

use crate::error::{Result, StixError};
use crate::identifier::{Identifier, IdentifierError};
use crate::object::StixObject;
use crate::property::PropertyDescriptor;
use crate::schema::{check_property_name, check_type_name, ObjectCategory, ObjectSchema};
use crate::value::{Input, Inputs, Properties, PropertyValue};
use serde_json::Value;

/// Build a custom object schema
///
/// Caller properties are placed between `header` and `trailer`, the common
/// properties of the spec version.
///
/// # Errors
/// Returns [`StixError::InvalidRegistration`] if the type name or a caller
/// property name is invalid, or a caller property shadows a common one
pub fn custom_schema(
    type_name: &str,
    spec_version: &str,
    header: impl IntoIterator<Item = PropertyDescriptor>,
    properties: Vec<PropertyDescriptor>,
    trailer: impl IntoIterator<Item = PropertyDescriptor>,
) -> Result<ObjectSchema> {
    check_type_name(type_name)?;
    if properties.is_empty() {
        return Err(StixError::InvalidRegistration {
            type_name: type_name.to_string(),
            reason: "must define at least one property".to_string(),
        });
    }
    for descriptor in &properties {
        check_property_name(type_name, spec_version, descriptor.name())?;
    }

    let header: Vec<_> = header.into_iter().collect();
    let trailer: Vec<_> = trailer.into_iter().collect();
    if let Some(shadowed) = properties.iter().find(|d| {
        header
            .iter()
            .chain(&trailer)
            .any(|common| common.name() == d.name())
    }) {
        return Err(StixError::InvalidRegistration {
            type_name: type_name.to_string(),
            reason: format!("property '{}' is a common property", shadowed.name()),
        });
    }

    Ok(
        ObjectSchema::new(type_name, spec_version, ObjectCategory::Custom)
            .with_properties(header)
            .with_properties(properties)
            .with_properties(trailer),
    )
}

/// Keep an object of an unregistered type
///
/// Only `type` and `id` are checked. Fields are kept verbatim with `type`,
/// `spec_version` and `id` leading.
pub(crate) fn unregistered(type_name: &str, spec_version: &str, mut inputs: Inputs) -> Result<StixObject> {
    if type_name.is_empty() {
        return Err(StixError::MissingType {
            reason: "'type' must not be empty".to_string(),
        });
    }
    inputs.retain(|_, raw| !raw.is_null());
    inputs.shift_remove("type");

    let mut properties = Properties::new();
    properties.insert("type".to_string(), PropertyValue::String(type_name.to_string()));
    if let Some(version) = inputs.shift_remove("spec_version") {
        properties.insert("spec_version".to_string(), PropertyValue::Json(version.to_json()));
    }
    if let Some(raw) = inputs.shift_remove("id") {
        let id = unregistered_id(type_name, &raw)?;
        properties.insert("id".to_string(), PropertyValue::Identifier(id));
    }
    for (name, raw) in inputs {
        properties.insert(name, PropertyValue::Json(raw.to_json()));
    }

    Ok(StixObject::from_parts(
        type_name,
        spec_version,
        false,
        properties,
        Vec::new(),
    ))
}

fn unregistered_id(type_name: &str, raw: &Input) -> Result<Identifier> {
    let text = match raw {
        Input::Json(Value::String(s)) => s,
        other => {
            return Err(StixError::malformed_id(
                type_name,
                other.describe(),
                IdentifierError::Shape(other.describe()),
            ))
        }
    };
    Identifier::parse_typed(type_name, text, false)
        .map_err(|reason| StixError::malformed_id(type_name, text.as_str(), reason))
}
