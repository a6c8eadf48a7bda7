//! Object construction pipeline
//!
//! Applies a schema to raw inputs: drop nulls, screen undeclared properties,
//! report missing required ones, run every descriptor in declared order
//! (filling defaults inline), then check cross-field constraints. The
//! result is all-or-nothing unless errors are being collected for
//! diagnosis.

use crate::error::{Result, StixError};
use crate::identifier::{Identifier, IdentifierError};
use crate::object::StixObject;
use crate::property::{DefaultValue, PropertyDescriptor, PropertyError, PropertyKind, ValidationContext};
use crate::schema::{ObjectConstraint, ObjectSchema};
use crate::timestamp::{Precision, PrecisionConstraint, Timestamp};
use crate::value::{Input, Inputs, Properties, PropertyValue};
use chrono::{DateTime, Utc};

/// Where errors go: returned at once, or gathered
struct ErrorSink {
    collect: bool,
    found: Vec<StixError>,
}

impl ErrorSink {
    fn new(collect: bool) -> Self {
        Self {
            collect,
            found: Vec::new(),
        }
    }

    fn push(&mut self, error: StixError) -> Result<()> {
        if self.collect {
            self.found.push(error);
            Ok(())
        } else {
            Err(error)
        }
    }
}

struct Assembled {
    properties: Properties,
    defaulted: Vec<String>,
}

/// Build a registered object
pub(crate) fn build_object(
    schema: &ObjectSchema,
    inputs: Inputs,
    ctx: &ValidationContext<'_>,
) -> Result<StixObject> {
    let mut sink = ErrorSink::new(false);
    let assembled = assemble(schema, inputs, ctx, &mut sink)?;
    Ok(StixObject::from_parts(
        schema.type_name(),
        schema.spec_version(),
        true,
        assembled.properties,
        assembled.defaulted,
    ))
}

/// Run the pipeline and return every error found
pub(crate) fn check_object(
    schema: &ObjectSchema,
    inputs: Inputs,
    ctx: &ValidationContext<'_>,
) -> Vec<StixError> {
    let mut sink = ErrorSink::new(true);
    if let Err(e) = assemble(schema, inputs, ctx, &mut sink) {
        sink.found.push(e);
    }
    sink.found
}

/// Build an embedded sub-object; defaulted values are dropped
pub(crate) fn build_embedded(
    schema: &ObjectSchema,
    inputs: Inputs,
    ctx: &ValidationContext<'_>,
) -> Result<Properties> {
    let nested = ValidationContext {
        object_type: schema.type_name(),
        ..*ctx
    };
    let mut sink = ErrorSink::new(false);
    let Assembled {
        mut properties,
        defaulted,
    } = assemble(schema, inputs, &nested, &mut sink)?;
    for name in &defaulted {
        properties.shift_remove(name);
    }
    Ok(properties)
}

fn assemble(
    schema: &ObjectSchema,
    mut inputs: Inputs,
    ctx: &ValidationContext<'_>,
    sink: &mut ErrorSink,
) -> Result<Assembled> {
    let object_type = ctx.object_type;
    inputs.retain(|_, raw| !raw.is_null());

    let extras: Vec<String> = inputs
        .keys()
        .filter(|name| !schema.declares(name))
        .cloned()
        .collect();
    let mut custom = Vec::new();
    if !extras.is_empty() {
        if ctx.allow_custom {
            tracing::debug!(
                object_type,
                properties = ?extras,
                "keeping undeclared properties"
            );
            for name in &extras {
                if let Some(raw) = inputs.shift_remove(name) {
                    custom.push((name.clone(), raw));
                }
            }
        } else {
            for name in &extras {
                inputs.shift_remove(name);
            }
            sink.push(StixError::ExtraProperties {
                object_type: object_type.to_string(),
                properties: extras,
            })?;
        }
    }

    let missing: Vec<String> = schema
        .properties()
        .filter(|d| d.is_required() && d.default_value().is_none())
        .filter(|d| !inputs.contains_key(d.name()))
        .map(|d| d.name().to_string())
        .collect();
    if !missing.is_empty() {
        sink.push(StixError::MissingProperties {
            object_type: object_type.to_string(),
            properties: missing,
        })?;
    }

    // One instant for every time default of this construction
    let now = Utc::now();
    let mut properties = Properties::new();
    let mut defaulted = Vec::new();

    for descriptor in schema.properties() {
        let name = descriptor.name();
        if let Some(raw) = inputs.shift_remove(name) {
            match descriptor.validate(&raw, ctx) {
                Ok(value) => {
                    properties.insert(name.to_string(), value);
                }
                Err(e) => sink.push(attribute(descriptor, &raw, e, object_type))?,
            }
        } else if let Some(default) = descriptor.default_value() {
            match default_value(descriptor, default, &properties, now, ctx) {
                Ok(value) => {
                    if matches!(default, DefaultValue::Static(_)) && !descriptor.is_required() {
                        defaulted.push(name.to_string());
                    }
                    properties.insert(name.to_string(), value);
                }
                Err(e) => sink.push(e)?,
            }
        }
    }

    if let Some(id) = properties.get("id").and_then(PropertyValue::as_identifier) {
        if id.type_name() != object_type {
            sink.push(StixError::malformed_id(
                object_type,
                id.as_str(),
                IdentifierError::TypeMismatch {
                    expected: object_type.to_string(),
                    found: id.type_name().to_string(),
                },
            ))?;
        }
    }

    check_constraints(schema, &properties, &defaulted, object_type, sink)?;

    for (name, raw) in custom {
        properties.insert(name, PropertyValue::Json(raw.to_json()));
    }

    Ok(Assembled {
        properties,
        defaulted,
    })
}

/// Wrap a property error with its object type and property name
fn attribute(
    descriptor: &PropertyDescriptor,
    raw: &Input,
    error: PropertyError,
    object_type: &str,
) -> StixError {
    match (descriptor.kind(), error) {
        (PropertyKind::Id, PropertyError::Identifier(reason)) => {
            let id = match raw {
                Input::Json(serde_json::Value::String(s)) => s.clone(),
                other => other.describe(),
            };
            StixError::malformed_id(object_type, id, reason)
        }
        (_, error) => StixError::invalid_value(object_type, descriptor.name(), error.to_string()),
    }
}

fn default_value(
    descriptor: &PropertyDescriptor,
    default: &DefaultValue,
    properties: &Properties,
    now: DateTime<Utc>,
    ctx: &ValidationContext<'_>,
) -> Result<PropertyValue> {
    let (precision, constraint) = descriptor
        .kind()
        .timestamp_precision()
        .unwrap_or((Precision::Any, PrecisionConstraint::Min));

    let value = match default {
        DefaultValue::Now => {
            PropertyValue::Timestamp(Timestamp::from_datetime(now, precision, constraint))
        }
        DefaultValue::Created => {
            let created = properties
                .get("created")
                .and_then(PropertyValue::as_timestamp)
                .map_or(now, |ts| *ts.as_datetime());
            PropertyValue::Timestamp(Timestamp::from_datetime(created, precision, constraint))
        }
        DefaultValue::Static(value) => value.clone(),
        DefaultValue::GeneratedId => PropertyValue::Identifier(
            Identifier::generate(ctx.object_type)
                .map_err(|e| StixError::malformed_id(ctx.object_type, ctx.object_type, e))?,
        ),
        DefaultValue::SchemaVersion => PropertyValue::String(ctx.spec_version.to_string()),
        DefaultValue::TypeName => PropertyValue::String(ctx.object_type.to_string()),
    };
    Ok(value)
}

fn check_constraints(
    schema: &ObjectSchema,
    properties: &Properties,
    defaulted: &[String],
    object_type: &str,
    sink: &mut ErrorSink,
) -> Result<()> {
    let present = |name: &String| properties.contains_key(name) && !defaulted.contains(name);
    let mut dependencies = Vec::new();

    for constraint in schema.constraints() {
        match constraint {
            ObjectConstraint::AtLeastOne(names) => {
                if !names.iter().any(present) {
                    sink.push(StixError::AtLeastOneProperty {
                        object_type: object_type.to_string(),
                        properties: names.clone(),
                    })?;
                }
            }
            ObjectConstraint::MutuallyExclusive(names) => {
                if names.iter().filter(|n| present(*n)).count() > 1 {
                    sink.push(StixError::MutuallyExclusiveProperties {
                        object_type: object_type.to_string(),
                        properties: names.clone(),
                    })?;
                }
            }
            ObjectConstraint::Dependency { dependent, on } => {
                if present(dependent) && !present(on) {
                    dependencies.push((dependent.clone(), on.clone()));
                }
            }
            ObjectConstraint::TimestampOrder {
                earlier,
                later,
                strict,
            } => {
                let first = properties.get(earlier).and_then(PropertyValue::as_timestamp);
                let second = properties.get(later).and_then(PropertyValue::as_timestamp);
                if let (Some(first), Some(second)) = (first, second) {
                    let ordered = if *strict {
                        second.is_after(first)
                    } else {
                        !second.is_before(first)
                    };
                    if !ordered {
                        let relation = if *strict {
                            "later than"
                        } else {
                            "later than or equal to"
                        };
                        sink.push(StixError::invalid_value(
                            object_type,
                            later.as_str(),
                            format!("{later} must be {relation} {earlier}"),
                        ))?;
                    }
                }
            }
        }
    }

    if !dependencies.is_empty() {
        sink.push(StixError::DependentProperties {
            object_type: object_type.to_string(),
            dependencies,
        })?;
    }
    Ok(())
}
