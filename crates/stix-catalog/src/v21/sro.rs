//! STIX 2.1 relationship objects

use crate::common::{object_schema, references, NOT_RELATABLE, V21};
use stix_core::{
    DefaultValue, ObjectCategory, ObjectConstraint, ObjectSchema, PropertyDescriptor, PropertyKind,
    PropertyValue, ReferenceRule,
};

/// `relationship_type` is lowercase letters, digits and hyphens
pub(crate) fn check_relationship_type(value: &PropertyValue) -> Result<(), String> {
    let text = value.as_str().unwrap_or_default();
    if !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        Ok(())
    } else {
        Err(format!(
            "'{text}' must contain only lowercase letters, digits and hyphens"
        ))
    }
}

pub(crate) fn relationship_properties() -> Vec<PropertyDescriptor> {
    vec![
        PropertyDescriptor::new("relationship_type", PropertyKind::string())
            .required()
            .with_check(check_relationship_type),
        PropertyDescriptor::new("description", PropertyKind::string()),
        PropertyDescriptor::new(
            "source_ref",
            PropertyKind::reference(ReferenceRule::except(NOT_RELATABLE)),
        )
        .required(),
        PropertyDescriptor::new(
            "target_ref",
            PropertyKind::reference(ReferenceRule::except(NOT_RELATABLE)),
        )
        .required(),
    ]
}

pub(crate) fn relationship() -> ObjectSchema {
    let mut properties = relationship_properties();
    properties.push(PropertyDescriptor::new("start_time", PropertyKind::timestamp()));
    properties.push(PropertyDescriptor::new("stop_time", PropertyKind::timestamp()));
    object_schema("relationship", V21, ObjectCategory::Relationship, properties)
        .with_constraint(ObjectConstraint::later_than("stop_time", "start_time"))
}

pub(crate) fn sighting() -> ObjectSchema {
    object_schema(
        "sighting",
        V21,
        ObjectCategory::Relationship,
        vec![
            PropertyDescriptor::new("description", PropertyKind::string()),
            PropertyDescriptor::new("first_seen", PropertyKind::timestamp()),
            PropertyDescriptor::new("last_seen", PropertyKind::timestamp()),
            PropertyDescriptor::new("count", PropertyKind::integer_range(0, 999_999_999)),
            PropertyDescriptor::new(
                "sighting_of_ref",
                PropertyKind::reference(ReferenceRule::except(NOT_RELATABLE)),
            )
            .required(),
            PropertyDescriptor::new(
                "observed_data_refs",
                references(ReferenceRule::to(&["observed-data"])),
            ),
            PropertyDescriptor::new(
                "where_sighted_refs",
                references(ReferenceRule::to(&["identity", "location"])),
            ),
            PropertyDescriptor::new("summary", PropertyKind::Boolean)
                .with_default(DefaultValue::Static(PropertyValue::Boolean(false))),
        ],
    )
    .with_constraint(ObjectConstraint::not_before("last_seen", "first_seen"))
}

pub(crate) fn schemas() -> Vec<ObjectSchema> {
    vec![relationship(), sighting()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_type_rule() {
        assert!(check_relationship_type(&PropertyValue::String("indicates".into())).is_ok());
        assert!(check_relationship_type(&PropertyValue::String("derived-from".into())).is_ok());
        assert!(check_relationship_type(&PropertyValue::String("Indicates".into())).is_err());
        assert!(check_relationship_type(&PropertyValue::String("has space".into())).is_err());
        assert!(check_relationship_type(&PropertyValue::String(String::new())).is_err());
    }

    #[test]
    fn schemas_are_well_formed() {
        for schema in schemas() {
            assert!(schema.check_definition().is_ok(), "{}", schema.type_name());
        }
    }
}
