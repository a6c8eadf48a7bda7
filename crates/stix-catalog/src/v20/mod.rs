//! STIX 2.0 schema tables
//!
//! 2.0 objects carry no `spec_version`, store `created`/`modified` with
//! exactly millisecond precision, and use required `labels` where 2.1 has
//! typed `*_types` lists.

use crate::common::{
    created, created_by_ref, identity_header, kill_chain_phases, marking_properties,
    object_schema, references, strings, vocab_list, V20,
};
use crate::v21::relationship_properties;
use crate::vocab;
use stix_core::{
    DefaultValue, ObjectCategory, ObjectConstraint, ObjectSchema, PropertyDescriptor, PropertyKind,
    ReferenceRule,
};

fn sdo(type_name: &str, properties: Vec<PropertyDescriptor>) -> ObjectSchema {
    object_schema(type_name, V20, ObjectCategory::Domain, properties)
}

/// Replace the optional common `labels` with a required vocabulary list
fn required_labels(schema: ObjectSchema, vocab: &'static [&'static str]) -> ObjectSchema {
    schema.with_property(PropertyDescriptor::new("labels", vocab_list(vocab)).required())
}

fn name() -> PropertyDescriptor {
    PropertyDescriptor::new("name", PropertyKind::string()).required()
}

fn description() -> PropertyDescriptor {
    PropertyDescriptor::new("description", PropertyKind::string())
}

pub(crate) fn campaign() -> ObjectSchema {
    sdo(
        "campaign",
        vec![
            name(),
            description(),
            PropertyDescriptor::new("aliases", strings()),
            PropertyDescriptor::new("first_seen", PropertyKind::timestamp()),
            PropertyDescriptor::new("last_seen", PropertyKind::timestamp()),
            PropertyDescriptor::new("objective", PropertyKind::string()),
        ],
    )
}

pub(crate) fn identity() -> ObjectSchema {
    sdo(
        "identity",
        vec![
            name(),
            description(),
            PropertyDescriptor::new("identity_class", PropertyKind::OpenVocab(vocab::IDENTITY_CLASS))
                .required(),
            PropertyDescriptor::new("sectors", vocab_list(vocab::INDUSTRY_SECTOR)),
            PropertyDescriptor::new("contact_information", PropertyKind::string()),
        ],
    )
}

pub(crate) fn indicator() -> ObjectSchema {
    let schema = sdo(
        "indicator",
        vec![
            PropertyDescriptor::new("name", PropertyKind::string()),
            description(),
            PropertyDescriptor::new("pattern", PropertyKind::non_empty_string()).required(),
            PropertyDescriptor::new("valid_from", PropertyKind::timestamp())
                .required()
                .with_default(DefaultValue::Now),
            PropertyDescriptor::new("valid_until", PropertyKind::timestamp()),
            kill_chain_phases(V20),
        ],
    )
    .with_constraint(ObjectConstraint::later_than("valid_until", "valid_from"));
    required_labels(schema, vocab::INDICATOR_LABEL_20)
}

pub(crate) fn malware() -> ObjectSchema {
    required_labels(
        sdo("malware", vec![name(), description(), kill_chain_phases(V20)]),
        vocab::MALWARE_LABEL_20,
    )
}

pub(crate) fn report() -> ObjectSchema {
    required_labels(
        sdo(
            "report",
            vec![
                name(),
                description(),
                PropertyDescriptor::new("published", PropertyKind::timestamp()).required(),
                PropertyDescriptor::new("object_refs", references(ReferenceRule::ANY)).required(),
            ],
        ),
        vocab::REPORT_LABEL_20,
    )
}

pub(crate) fn relationship() -> ObjectSchema {
    object_schema(
        "relationship",
        V20,
        ObjectCategory::Relationship,
        relationship_properties(),
    )
}

pub(crate) fn marking_definition() -> ObjectSchema {
    ObjectSchema::new("marking-definition", V20, ObjectCategory::Meta)
        .with_properties(identity_header(V20))
        .with_property(created_by_ref())
        .with_property(created(V20))
        .with_property(PropertyDescriptor::new("definition_type", PropertyKind::string()).required())
        .with_property(PropertyDescriptor::new("definition", PropertyKind::Dictionary).required())
        .with_properties(marking_properties(V20))
}

/// 2.0 bundles name the spec version of their members
pub(crate) fn bundle() -> ObjectSchema {
    ObjectSchema::new("bundle", V20, ObjectCategory::Bundle)
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
        .with_property(
            PropertyDescriptor::new("spec_version", PropertyKind::SpecVersion)
                .required()
                .with_default(DefaultValue::SchemaVersion),
        )
        .with_property(PropertyDescriptor::new(
            "objects",
            PropertyKind::list_of(PropertyKind::Objects),
        ))
}

/// Every registrable 2.0 schema
pub(crate) fn schemas() -> Vec<ObjectSchema> {
    vec![
        campaign(),
        identity(),
        indicator(),
        malware(),
        report(),
        relationship(),
        marking_definition(),
        bundle(),
    ]
}
