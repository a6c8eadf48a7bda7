//! Properties shared by every object of a spec version, and the embedded
//! sub-object schemas.

use once_cell::sync::Lazy;
use stix_core::{
    DefaultValue, ObjectCategory, ObjectConstraint, ObjectSchema, Precision, PrecisionConstraint,
    PropertyDescriptor, PropertyKind, PropertyValue, ReferenceRule,
};
use std::sync::Arc;

pub(crate) const V20: &str = "2.0";
pub(crate) const V21: &str = "2.1";

/// Types that relationships and sightings may not point at
pub(crate) const NOT_RELATABLE: &[&str] = &[
    "bundle",
    "language-content",
    "marking-definition",
    "relationship",
    "sighting",
];

pub(crate) static EXTERNAL_REFERENCE_21: Lazy<Arc<ObjectSchema>> =
    Lazy::new(|| Arc::new(external_reference(V21)));

pub(crate) static EXTERNAL_REFERENCE_20: Lazy<Arc<ObjectSchema>> =
    Lazy::new(|| Arc::new(external_reference(V20)));

pub(crate) static KILL_CHAIN_PHASE_21: Lazy<Arc<ObjectSchema>> =
    Lazy::new(|| Arc::new(kill_chain_phase(V21)));

pub(crate) static KILL_CHAIN_PHASE_20: Lazy<Arc<ObjectSchema>> =
    Lazy::new(|| Arc::new(kill_chain_phase(V20)));

pub(crate) static GRANULAR_MARKING_21: Lazy<Arc<ObjectSchema>> = Lazy::new(|| {
    Arc::new(
        ObjectSchema::new("granular-marking", V21, ObjectCategory::Embedded)
            .with_property(PropertyDescriptor::new("lang", PropertyKind::string()))
            .with_property(PropertyDescriptor::new(
                "marking_ref",
                PropertyKind::reference(ReferenceRule::to(&["marking-definition"])),
            ))
            .with_property(
                PropertyDescriptor::new("selectors", PropertyKind::list_of(PropertyKind::string()))
                    .required(),
            )
            .with_constraint(ObjectConstraint::at_least_one(["lang", "marking_ref"]))
            .with_constraint(ObjectConstraint::mutually_exclusive(["lang", "marking_ref"])),
    )
});

pub(crate) static GRANULAR_MARKING_20: Lazy<Arc<ObjectSchema>> = Lazy::new(|| {
    Arc::new(
        ObjectSchema::new("granular-marking", V20, ObjectCategory::Embedded)
            .with_property(
                PropertyDescriptor::new(
                    "marking_ref",
                    PropertyKind::reference(ReferenceRule::to(&["marking-definition"])),
                )
                .required(),
            )
            .with_property(
                PropertyDescriptor::new("selectors", PropertyKind::list_of(PropertyKind::string()))
                    .required(),
            ),
    )
});

fn external_reference(version: &str) -> ObjectSchema {
    let schema = ObjectSchema::new("external-reference", version, ObjectCategory::Embedded)
        .with_property(PropertyDescriptor::new("source_name", PropertyKind::string()).required())
        .with_property(PropertyDescriptor::new("description", PropertyKind::string()))
        .with_property(PropertyDescriptor::new("url", PropertyKind::string()))
        .with_property(PropertyDescriptor::new("hashes", PropertyKind::Hashes))
        .with_property(PropertyDescriptor::new("external_id", PropertyKind::string()));
    if version == V21 {
        schema.with_constraint(ObjectConstraint::at_least_one([
            "description",
            "external_id",
            "url",
        ]))
    } else {
        schema
    }
}

fn kill_chain_phase(version: &str) -> ObjectSchema {
    ObjectSchema::new("kill-chain-phase", version, ObjectCategory::Embedded)
        .with_property(PropertyDescriptor::new("kill_chain_name", PropertyKind::string()).required())
        .with_property(PropertyDescriptor::new("phase_name", PropertyKind::string()).required())
}

/// List of embedded sub-objects
pub(crate) fn embedded_list(schema: &Arc<ObjectSchema>) -> PropertyKind {
    PropertyKind::list_of(PropertyKind::embedded(Arc::clone(schema)))
}

pub(crate) fn strings() -> PropertyKind {
    PropertyKind::list_of(PropertyKind::string())
}

pub(crate) fn vocab_list(vocab: &'static [&'static str]) -> PropertyKind {
    PropertyKind::list_of(PropertyKind::OpenVocab(vocab))
}

pub(crate) fn references(rule: ReferenceRule) -> PropertyKind {
    PropertyKind::list_of(PropertyKind::reference(rule))
}

pub(crate) fn kill_chain_phases(version: &str) -> PropertyDescriptor {
    let schema = if version == V20 {
        &KILL_CHAIN_PHASE_20
    } else {
        &KILL_CHAIN_PHASE_21
    };
    PropertyDescriptor::new("kill_chain_phases", embedded_list(schema))
}

/// `type`, `spec_version` (2.1 only), `id`
pub(crate) fn identity_header(version: &str) -> Vec<PropertyDescriptor> {
    let mut header = vec![PropertyDescriptor::new("type", PropertyKind::Type)
        .required()
        .with_default(DefaultValue::TypeName)];
    if version != V20 {
        header.push(
            PropertyDescriptor::new("spec_version", PropertyKind::SpecVersion)
                .required()
                .with_default(DefaultValue::SchemaVersion),
        );
    }
    header.push(
        PropertyDescriptor::new("id", PropertyKind::Id)
            .required()
            .with_default(DefaultValue::GeneratedId),
    );
    header
}

/// Creation timestamp; 2.0 stores exactly milliseconds
pub(crate) fn created(version: &str) -> PropertyDescriptor {
    PropertyDescriptor::new("created", object_timestamp(version))
        .required()
        .with_default(DefaultValue::Now)
}

pub(crate) fn modified(version: &str) -> PropertyDescriptor {
    PropertyDescriptor::new("modified", object_timestamp(version))
        .required()
        .with_default(DefaultValue::Created)
}

fn object_timestamp(version: &str) -> PropertyKind {
    if version == V20 {
        PropertyKind::Timestamp {
            precision: Precision::Millisecond,
            constraint: PrecisionConstraint::Exact,
        }
    } else {
        PropertyKind::timestamp_millis()
    }
}

pub(crate) fn created_by_ref() -> PropertyDescriptor {
    PropertyDescriptor::new(
        "created_by_ref",
        PropertyKind::reference(ReferenceRule::to(&["identity"])),
    )
}

/// Properties every SDO and SRO starts with
pub(crate) fn header(version: &str) -> Vec<PropertyDescriptor> {
    let mut header = identity_header(version);
    header.push(created_by_ref());
    header.push(created(version));
    header.push(modified(version));
    header
}

/// Marking properties shared by every object, meta objects included
pub(crate) fn marking_properties(version: &str) -> Vec<PropertyDescriptor> {
    let (external, granular) = if version == V20 {
        (&EXTERNAL_REFERENCE_20, &GRANULAR_MARKING_20)
    } else {
        (&EXTERNAL_REFERENCE_21, &GRANULAR_MARKING_21)
    };
    let mut props = vec![
        PropertyDescriptor::new("external_references", embedded_list(external)),
        PropertyDescriptor::new(
            "object_marking_refs",
            references(ReferenceRule::to(&["marking-definition"])),
        ),
        PropertyDescriptor::new("granular_markings", embedded_list(granular)),
    ];
    if version != V20 {
        props.push(PropertyDescriptor::new("extensions", PropertyKind::Dictionary));
    }
    props
}

/// Properties every SDO and SRO ends with
pub(crate) fn trailer(version: &str) -> Vec<PropertyDescriptor> {
    let mut trailer = vec![
        PropertyDescriptor::new("revoked", PropertyKind::Boolean)
            .with_default(DefaultValue::Static(PropertyValue::Boolean(false))),
        PropertyDescriptor::new("labels", strings()),
    ];
    if version != V20 {
        trailer.push(PropertyDescriptor::new(
            "confidence",
            PropertyKind::integer_range(0, 100),
        ));
        trailer.push(PropertyDescriptor::new("lang", PropertyKind::string()));
    }
    trailer.extend(marking_properties(version));
    trailer
}

/// Assemble a domain or relationship schema from its specific properties
pub(crate) fn object_schema(
    type_name: &str,
    version: &str,
    category: ObjectCategory,
    properties: Vec<PropertyDescriptor>,
) -> ObjectSchema {
    ObjectSchema::new(type_name, version, category)
        .with_properties(header(version))
        .with_properties(properties)
        .with_properties(trailer(version))
}
