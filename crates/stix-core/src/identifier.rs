//! STIX identifiers
//!
//! Provides [`Identifier`], the `<type>--<UUID>` value used both as an
//! object's own `id` and as the target of every reference property.

use crate::error::{Result, StixError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use uuid::{Uuid, Variant};

/// Separator between type prefix and UUID
pub const SEPARATOR: &str = "--";

static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([a-z0-9]+(?:-[a-z0-9]+)*)--([0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})$",
    )
    .expect("identifier pattern is valid")
});

static TYPE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("type name pattern is valid"));

/// Errors describing why a candidate is not a valid identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// No `--` between type and UUID, or extra characters around them
    #[error("'{0}' is not of the form <type>--<uuid>")]
    Shape(String),

    /// Type prefix is not a valid STIX type name
    #[error("'{0}' is not a valid STIX type name")]
    InvalidTypeName(String),

    /// UUID part could not be parsed
    #[error("invalid UUID '{uuid}': {reason}")]
    InvalidUuid { uuid: String, reason: String },

    /// UUID is not an RFC 4122 variant (STIX 2.1 requirement)
    #[error("UUID '{0}' is not an RFC 4122 variant")]
    NotRfc4122(String),

    /// Type prefix differs from the expected type
    #[error("type prefix '{found}' does not match '{expected}'")]
    TypeMismatch { expected: String, found: String },
}

/// A validated `<type>--<UUID>` identifier
///
/// The original text is kept verbatim so identifiers round-trip exactly.
///
/// # Example
/// ```
/// use stix_core::Identifier;
///
/// let id: Identifier = "campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c".parse().unwrap();
/// assert_eq!(id.type_name(), "campaign");
///
/// // Single hyphen separator is rejected
/// assert!("campaign-83422c77-904c-4dc1-aff5-5c38f3a2c55c".parse::<Identifier>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    raw: String,
    type_len: usize,
    uuid: Uuid,
}

impl Identifier {
    /// Generate a fresh identifier with a random (v4) UUID
    ///
    /// # Errors
    /// Returns error if `type_name` is not a valid STIX type name
    pub fn generate(type_name: &str) -> std::result::Result<Self, IdentifierError> {
        if !is_valid_type_name(type_name) {
            return Err(IdentifierError::InvalidTypeName(type_name.to_string()));
        }
        let uuid = Uuid::new_v4();
        Ok(Self {
            raw: format!("{type_name}{SEPARATOR}{uuid}"),
            type_len: type_name.len(),
            uuid,
        })
    }

    /// Parse any well-shaped identifier
    ///
    /// With `strict`, the UUID must also be an RFC 4122 variant.
    ///
    /// # Errors
    /// Returns error if the candidate is not `<type>--<uuid>`
    pub fn parse(candidate: &str, strict: bool) -> std::result::Result<Self, IdentifierError> {
        let captures = IDENTIFIER_PATTERN
            .captures(candidate)
            .ok_or_else(|| Self::diagnose_shape(candidate))?;

        let (type_match, uuid_match) = match (captures.get(1), captures.get(2)) {
            (Some(t), Some(u)) => (t, u),
            _ => return Err(IdentifierError::Shape(candidate.to_string())),
        };

        let uuid =
            Uuid::parse_str(uuid_match.as_str()).map_err(|e| IdentifierError::InvalidUuid {
                uuid: uuid_match.as_str().to_string(),
                reason: e.to_string(),
            })?;

        if strict && uuid.get_variant() != Variant::RFC4122 {
            return Err(IdentifierError::NotRfc4122(uuid_match.as_str().to_string()));
        }

        Ok(Self {
            raw: candidate.to_string(),
            type_len: type_match.as_str().len(),
            uuid,
        })
    }

    /// Parse and require a specific type prefix
    ///
    /// # Errors
    /// Returns error on bad shape or prefix mismatch
    pub fn parse_typed(
        type_name: &str,
        candidate: &str,
        strict: bool,
    ) -> std::result::Result<Self, IdentifierError> {
        let id = Self::parse(candidate, strict)?;
        if id.type_name() != type_name {
            return Err(IdentifierError::TypeMismatch {
                expected: type_name.to_string(),
                found: id.type_name().to_string(),
            });
        }
        Ok(id)
    }

    // More specific error than a bare shape failure when possible
    fn diagnose_shape(candidate: &str) -> IdentifierError {
        match candidate.split_once(SEPARATOR) {
            Some((prefix, _)) if !is_valid_type_name(prefix) => {
                IdentifierError::InvalidTypeName(prefix.to_string())
            }
            Some((_, uuid)) => IdentifierError::InvalidUuid {
                uuid: uuid.to_string(),
                reason: "expected 8-4-4-4-12 hexadecimal groups".to_string(),
            },
            None => IdentifierError::Shape(candidate.to_string()),
        }
    }

    /// Type prefix
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.raw[..self.type_len]
    }

    /// UUID part
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> &Uuid {
        &self.uuid
    }

    /// Full identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Consume into the identifier text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.raw
    }
}

/// Check a STIX type name (lowercase alphanumerics separated by single hyphens)
#[inline]
#[must_use]
pub fn is_valid_type_name(type_name: &str) -> bool {
    TYPE_NAME_PATTERN.is_match(type_name)
}

/// Validate `candidate` as an identifier for objects of `type_name`
///
/// # Errors
/// Returns [`StixError::MalformedId`] unless the candidate matches
/// `^<type_name>--<uuid>$` exactly
pub fn validate_id(type_name: &str, candidate: &str) -> Result<Identifier> {
    Identifier::parse_typed(type_name, candidate, false)
        .map_err(|reason| StixError::malformed_id(type_name, candidate, reason))
}

/// Generate a fresh identifier for `type_name`
///
/// # Errors
/// Returns [`StixError::MalformedId`] if `type_name` is not a valid type name
pub fn new_id(type_name: &str) -> Result<Identifier> {
    Identifier::generate(type_name)
        .map_err(|reason| StixError::malformed_id(type_name, type_name, reason))
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s, false)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMPAIGN_ID: &str = "campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c";

    #[test]
    fn parse_valid_identifier() {
        let id = Identifier::parse(CAMPAIGN_ID, true).unwrap();
        assert_eq!(id.type_name(), "campaign");
        assert_eq!(id.as_str(), CAMPAIGN_ID);
        assert_eq!(
            id.uuid().to_string(),
            "83422c77-904c-4dc1-aff5-5c38f3a2c55c"
        );
    }

    #[test]
    fn parse_hyphenated_type_name() {
        let id: Identifier = "attack-pattern--7e33a43e-e34b-40ec-89da-36c9bb2cacd5"
            .parse()
            .unwrap();
        assert_eq!(id.type_name(), "attack-pattern");
    }

    #[test]
    fn single_hyphen_separator_rejected() {
        let result = Identifier::parse("campaign-83422c77-904c-4dc1-aff5-5c38f3a2c55c", false);
        assert!(matches!(result, Err(IdentifierError::Shape(_))));
    }

    #[test]
    fn bad_uuid_rejected() {
        let result = Identifier::parse("campaign--not-a-uuid", false);
        assert!(matches!(result, Err(IdentifierError::InvalidUuid { .. })));
    }

    #[test]
    fn uppercase_type_rejected() {
        let result = Identifier::parse("Campaign--83422c77-904c-4dc1-aff5-5c38f3a2c55c", false);
        assert!(matches!(result, Err(IdentifierError::InvalidTypeName(_))));
    }

    #[test]
    fn trailing_text_rejected() {
        let candidate = format!("{CAMPAIGN_ID}x");
        assert!(Identifier::parse(&candidate, false).is_err());
    }

    #[test]
    fn strict_rejects_non_rfc4122_variant() {
        // variant nibble 'c' is the Microsoft variant
        let candidate = "campaign--83422c77-904c-4dc1-cff5-5c38f3a2c55c";
        assert!(Identifier::parse(candidate, false).is_ok());
        assert!(matches!(
            Identifier::parse(candidate, true),
            Err(IdentifierError::NotRfc4122(_))
        ));
    }

    #[test]
    fn validate_id_checks_prefix() {
        assert!(validate_id("campaign", CAMPAIGN_ID).is_ok());

        let err = validate_id("report", CAMPAIGN_ID).unwrap_err();
        assert!(matches!(
            err,
            StixError::MalformedId {
                reason: IdentifierError::TypeMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn validate_id_rejects_single_hyphen() {
        let err = validate_id("campaign", "campaign-83422c77-904c-4dc1-aff5-5c38f3a2c55c")
            .unwrap_err();
        assert_eq!(err.object_type(), Some("campaign"));
    }

    #[test]
    fn new_id_is_valid_and_unique() {
        let a = new_id("indicator").unwrap();
        let b = new_id("indicator").unwrap();
        assert_ne!(a, b);
        assert!(Identifier::parse(a.as_str(), true).is_ok());
        assert_eq!(a.type_name(), "indicator");
    }

    #[test]
    fn new_id_rejects_bad_type_name() {
        assert!(new_id("Not A Type").is_err());
    }

    #[test]
    fn serde_roundtrip_as_string() {
        let id: Identifier = CAMPAIGN_ID.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{CAMPAIGN_ID}\""));
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    proptest::proptest! {
        #[test]
        fn generated_ids_parse_strictly(type_name in "[a-z][a-z0-9]{2,10}(-[a-z0-9]{1,8}){0,2}") {
            let id = Identifier::generate(&type_name).unwrap();
            let parsed = Identifier::parse(id.as_str(), true).unwrap();
            proptest::prop_assert_eq!(parsed.type_name(), type_name.as_str());
            proptest::prop_assert_eq!(parsed, id);
        }

        #[test]
        fn any_uuid_with_valid_type_parses(bytes in proptest::array::uniform16(proptest::num::u8::ANY)) {
            let uuid = Uuid::from_bytes(bytes);
            let candidate = format!("indicator--{uuid}");
            let id = Identifier::parse(&candidate, false).unwrap();
            proptest::prop_assert_eq!(id.uuid(), &uuid);
        }
    }
}
