//! STIX 2.1 schema tables

mod meta;
mod sdo;
mod sro;

/// Every registrable 2.1 schema
pub(crate) fn schemas() -> Vec<stix_core::ObjectSchema> {
    let mut schemas = sdo::schemas();
    schemas.extend(sro::schemas());
    schemas.extend(meta::schemas());
    schemas
}

pub(crate) use sro::relationship_properties;
