//! STIX 2.1 domain objects

use crate::common::{
    kill_chain_phases, object_schema, references, strings, vocab_list, V21,
};
use crate::vocab;
use stix_core::{
    DefaultValue, ObjectCategory, ObjectConstraint, ObjectSchema, PropertyDescriptor, PropertyKind,
    ReferenceRule,
};

fn sdo(type_name: &str, properties: Vec<PropertyDescriptor>) -> ObjectSchema {
    object_schema(type_name, V21, ObjectCategory::Domain, properties)
}

fn name() -> PropertyDescriptor {
    PropertyDescriptor::new("name", PropertyKind::string()).required()
}

fn description() -> PropertyDescriptor {
    PropertyDescriptor::new("description", PropertyKind::string())
}

fn aliases() -> PropertyDescriptor {
    PropertyDescriptor::new("aliases", strings())
}

fn first_seen() -> PropertyDescriptor {
    PropertyDescriptor::new("first_seen", PropertyKind::timestamp())
}

fn last_seen() -> PropertyDescriptor {
    PropertyDescriptor::new("last_seen", PropertyKind::timestamp())
}

fn object_refs() -> PropertyDescriptor {
    PropertyDescriptor::new("object_refs", references(ReferenceRule::ANY)).required()
}

fn seen_in_order() -> ObjectConstraint {
    ObjectConstraint::not_before("last_seen", "first_seen")
}

pub(crate) fn attack_pattern() -> ObjectSchema {
    sdo(
        "attack-pattern",
        vec![name(), description(), aliases(), kill_chain_phases(V21)],
    )
}

pub(crate) fn campaign() -> ObjectSchema {
    sdo(
        "campaign",
        vec![
            name(),
            description(),
            aliases(),
            first_seen(),
            last_seen(),
            PropertyDescriptor::new("objective", PropertyKind::string()),
        ],
    )
    .with_constraint(seen_in_order())
}

pub(crate) fn course_of_action() -> ObjectSchema {
    sdo("course-of-action", vec![name(), description()])
}

pub(crate) fn grouping() -> ObjectSchema {
    sdo(
        "grouping",
        vec![
            PropertyDescriptor::new("name", PropertyKind::string()),
            description(),
            PropertyDescriptor::new("context", PropertyKind::OpenVocab(vocab::GROUPING_CONTEXT))
                .required(),
            object_refs(),
        ],
    )
}

pub(crate) fn identity() -> ObjectSchema {
    sdo(
        "identity",
        vec![
            name(),
            description(),
            PropertyDescriptor::new("roles", strings()),
            PropertyDescriptor::new("identity_class", PropertyKind::OpenVocab(vocab::IDENTITY_CLASS)),
            PropertyDescriptor::new("sectors", vocab_list(vocab::INDUSTRY_SECTOR)),
            PropertyDescriptor::new("contact_information", PropertyKind::string()),
        ],
    )
}

pub(crate) fn indicator() -> ObjectSchema {
    sdo(
        "indicator",
        vec![
            PropertyDescriptor::new("name", PropertyKind::string()),
            description(),
            PropertyDescriptor::new("indicator_types", vocab_list(vocab::INDICATOR_TYPE)),
            PropertyDescriptor::new("pattern", PropertyKind::non_empty_string()).required(),
            PropertyDescriptor::new("pattern_type", PropertyKind::OpenVocab(vocab::PATTERN_TYPE))
                .required(),
            PropertyDescriptor::new("pattern_version", PropertyKind::string()),
            PropertyDescriptor::new("valid_from", PropertyKind::timestamp())
                .required()
                .with_default(DefaultValue::Now),
            PropertyDescriptor::new("valid_until", PropertyKind::timestamp()),
            kill_chain_phases(V21),
        ],
    )
    .with_constraint(ObjectConstraint::later_than("valid_until", "valid_from"))
}

pub(crate) fn infrastructure() -> ObjectSchema {
    sdo(
        "infrastructure",
        vec![
            name(),
            description(),
            PropertyDescriptor::new(
                "infrastructure_types",
                vocab_list(vocab::INFRASTRUCTURE_TYPE),
            ),
            aliases(),
            kill_chain_phases(V21),
            first_seen(),
            last_seen(),
        ],
    )
    .with_constraint(seen_in_order())
}

pub(crate) fn intrusion_set() -> ObjectSchema {
    sdo(
        "intrusion-set",
        vec![
            name(),
            description(),
            aliases(),
            first_seen(),
            last_seen(),
            PropertyDescriptor::new("goals", strings()),
            PropertyDescriptor::new(
                "resource_level",
                PropertyKind::OpenVocab(vocab::ATTACK_RESOURCE_LEVEL),
            ),
            PropertyDescriptor::new(
                "primary_motivation",
                PropertyKind::OpenVocab(vocab::ATTACK_MOTIVATION),
            ),
            PropertyDescriptor::new(
                "secondary_motivations",
                vocab_list(vocab::ATTACK_MOTIVATION),
            ),
        ],
    )
    .with_constraint(seen_in_order())
}

pub(crate) fn location() -> ObjectSchema {
    sdo(
        "location",
        vec![
            PropertyDescriptor::new("name", PropertyKind::string()),
            description(),
            PropertyDescriptor::new(
                "latitude",
                PropertyKind::float_range(Some(-90.0), Some(90.0)),
            ),
            PropertyDescriptor::new(
                "longitude",
                PropertyKind::float_range(Some(-180.0), Some(180.0)),
            ),
            PropertyDescriptor::new("precision", PropertyKind::float_range(Some(0.0), None)),
            PropertyDescriptor::new("region", PropertyKind::OpenVocab(vocab::REGION)),
            PropertyDescriptor::new("country", PropertyKind::string()),
            PropertyDescriptor::new("administrative_area", PropertyKind::string()),
            PropertyDescriptor::new("city", PropertyKind::string()),
            PropertyDescriptor::new("street_address", PropertyKind::string()),
            PropertyDescriptor::new("postal_code", PropertyKind::string()),
        ],
    )
    .with_constraint(ObjectConstraint::at_least_one(["region", "country", "latitude"]))
    .with_constraint(ObjectConstraint::dependency("latitude", "longitude"))
    .with_constraint(ObjectConstraint::dependency("longitude", "latitude"))
    .with_constraint(ObjectConstraint::dependency("precision", "latitude"))
}

pub(crate) fn malware() -> ObjectSchema {
    sdo(
        "malware",
        vec![
            PropertyDescriptor::new("name", PropertyKind::string()),
            description(),
            PropertyDescriptor::new("malware_types", vocab_list(vocab::MALWARE_TYPE)),
            PropertyDescriptor::new("is_family", PropertyKind::Boolean).required(),
            aliases(),
            kill_chain_phases(V21),
            first_seen(),
            last_seen(),
            PropertyDescriptor::new(
                "operating_system_refs",
                references(ReferenceRule::to(&["software"])),
            ),
            PropertyDescriptor::new(
                "architecture_execution_envs",
                vocab_list(vocab::PROCESSOR_ARCHITECTURE),
            ),
            PropertyDescriptor::new(
                "implementation_languages",
                vocab_list(vocab::IMPLEMENTATION_LANGUAGE),
            ),
            PropertyDescriptor::new("capabilities", vocab_list(vocab::MALWARE_CAPABILITIES)),
            PropertyDescriptor::new(
                "sample_refs",
                references(ReferenceRule::to(&["artifact", "file"])),
            ),
        ],
    )
    .with_constraint(seen_in_order())
}

pub(crate) fn note() -> ObjectSchema {
    sdo(
        "note",
        vec![
            PropertyDescriptor::new("abstract", PropertyKind::string()),
            PropertyDescriptor::new("content", PropertyKind::string()).required(),
            PropertyDescriptor::new("authors", strings()),
            object_refs(),
        ],
    )
}

pub(crate) fn observed_data() -> ObjectSchema {
    sdo(
        "observed-data",
        vec![
            PropertyDescriptor::new("first_observed", PropertyKind::timestamp()).required(),
            PropertyDescriptor::new("last_observed", PropertyKind::timestamp()).required(),
            PropertyDescriptor::new(
                "number_observed",
                PropertyKind::integer_range(1, 999_999_999),
            )
            .required(),
            PropertyDescriptor::new("objects", PropertyKind::Dictionary),
            PropertyDescriptor::new("object_refs", references(ReferenceRule::ANY)),
        ],
    )
    .with_constraint(ObjectConstraint::not_before("last_observed", "first_observed"))
    .with_constraint(ObjectConstraint::at_least_one(["objects", "object_refs"]))
    .with_constraint(ObjectConstraint::mutually_exclusive(["objects", "object_refs"]))
}

pub(crate) fn opinion() -> ObjectSchema {
    sdo(
        "opinion",
        vec![
            PropertyDescriptor::new("explanation", PropertyKind::string()),
            PropertyDescriptor::new("authors", strings()),
            PropertyDescriptor::new("opinion", PropertyKind::Enum(vocab::OPINION)).required(),
            object_refs(),
        ],
    )
}

pub(crate) fn report() -> ObjectSchema {
    sdo(
        "report",
        vec![
            name(),
            description(),
            PropertyDescriptor::new("report_types", vocab_list(vocab::REPORT_TYPE)),
            PropertyDescriptor::new("published", PropertyKind::timestamp()).required(),
            object_refs(),
        ],
    )
}

pub(crate) fn threat_actor() -> ObjectSchema {
    sdo(
        "threat-actor",
        vec![
            name(),
            description(),
            PropertyDescriptor::new("threat_actor_types", vocab_list(vocab::THREAT_ACTOR_TYPE)),
            aliases(),
            first_seen(),
            last_seen(),
            PropertyDescriptor::new("roles", vocab_list(vocab::THREAT_ACTOR_ROLE)),
            PropertyDescriptor::new("goals", strings()),
            PropertyDescriptor::new(
                "sophistication",
                PropertyKind::OpenVocab(vocab::THREAT_ACTOR_SOPHISTICATION),
            ),
            PropertyDescriptor::new(
                "resource_level",
                PropertyKind::OpenVocab(vocab::ATTACK_RESOURCE_LEVEL),
            ),
            PropertyDescriptor::new(
                "primary_motivation",
                PropertyKind::OpenVocab(vocab::ATTACK_MOTIVATION),
            ),
            PropertyDescriptor::new(
                "secondary_motivations",
                vocab_list(vocab::ATTACK_MOTIVATION),
            ),
            PropertyDescriptor::new(
                "personal_motivations",
                vocab_list(vocab::ATTACK_MOTIVATION),
            ),
        ],
    )
    .with_constraint(seen_in_order())
}

pub(crate) fn tool() -> ObjectSchema {
    sdo(
        "tool",
        vec![
            name(),
            description(),
            PropertyDescriptor::new("tool_types", vocab_list(vocab::TOOL_TYPE)),
            aliases(),
            kill_chain_phases(V21),
            PropertyDescriptor::new("tool_version", PropertyKind::string()),
        ],
    )
}

pub(crate) fn vulnerability() -> ObjectSchema {
    sdo("vulnerability", vec![name(), description()])
}

pub(crate) fn schemas() -> Vec<ObjectSchema> {
    vec![
        attack_pattern(),
        campaign(),
        course_of_action(),
        grouping(),
        identity(),
        indicator(),
        infrastructure(),
        intrusion_set(),
        location(),
        malware(),
        note(),
        observed_data(),
        opinion(),
        report(),
        threat_actor(),
        tool(),
        vulnerability(),
    ]
}
