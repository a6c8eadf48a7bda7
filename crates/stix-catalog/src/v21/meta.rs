//! STIX 2.1 meta objects: marking definitions and bundles

use crate::common::{created, created_by_ref, identity_header, marking_properties, V21};
use stix_core::{
    DefaultValue, ObjectCategory, ObjectConstraint, ObjectSchema, PropertyDescriptor, PropertyKind,
};

/// Marking definitions are never versioned, so they carry no `modified`
pub(crate) fn marking_definition() -> ObjectSchema {
    ObjectSchema::new("marking-definition", V21, ObjectCategory::Meta)
        .with_properties(identity_header(V21))
        .with_property(created_by_ref())
        .with_property(created(V21))
        .with_property(PropertyDescriptor::new("definition_type", PropertyKind::string()))
        .with_property(PropertyDescriptor::new("name", PropertyKind::string()))
        .with_property(PropertyDescriptor::new("definition", PropertyKind::Dictionary))
        .with_properties(marking_properties(V21))
        .with_constraint(ObjectConstraint::dependency("definition", "definition_type"))
}

/// A 2.1 bundle has no `spec_version`; each member carries its own
pub(crate) fn bundle() -> ObjectSchema {
    ObjectSchema::new("bundle", V21, ObjectCategory::Bundle)
        .with_property(
            PropertyDescriptor::new("type", PropertyKind::Type)
                .required()
                .with_default(DefaultValue::TypeName),
        )
        .with_property(
            PropertyDescriptor::new("id", PropertyKind::Id)
                .required()
                .with_default(DefaultValue::GeneratedId),
        )
        .with_property(PropertyDescriptor::new(
            "objects",
            PropertyKind::list_of(PropertyKind::Objects),
        ))
}

pub(crate) fn schemas() -> Vec<ObjectSchema> {
    vec![marking_definition(), bundle()]
}
