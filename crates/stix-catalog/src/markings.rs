//! Traffic Light Protocol marking definitions
//!
//! The four TLP markings have fixed identifiers and contents shared by
//! every STIX producer.

use serde_json::json;
use stix_core::{Input, Inputs, Result, StixObject, TypeRegistry};
use std::fmt::{self, Display, Formatter};

/// Creation time shared by all TLP markings
pub const TLP_CREATED: &str = "2017-01-20T00:00:00.000Z";

/// TLP level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlpLevel {
    White,
    Green,
    Amber,
    Red,
}

impl TlpLevel {
    /// All levels, least to most restrictive
    pub const ALL: [TlpLevel; 4] = [Self::White, Self::Green, Self::Amber, Self::Red];

    /// Fixed marking-definition identifier
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::White => "marking-definition--613f2e26-407d-48c7-9eca-b8e91df99dc9",
            Self::Green => "marking-definition--34098fce-860f-48ae-8e50-ebd3cc5e41da",
            Self::Amber => "marking-definition--f88d31f6-486f-44da-b317-01333bde0b82",
            Self::Red => "marking-definition--5e57c739-391a-4eb3-b6be-7d15ca92d5ed",
        }
    }

    /// Lowercase level name used inside the definition
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
        }
    }

    /// Look a level up by its marking-definition identifier
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.id() == id)
    }

    /// Build the marking definition for a spec version
    ///
    /// # Errors
    /// Returns error if the registry lacks the marking-definition schema
    pub fn definition(self, registry: &TypeRegistry, version: &str) -> Result<StixObject> {
        let mut inputs = Inputs::new();
        inputs.insert("id".to_string(), Input::from(self.id()));
        inputs.insert("created".to_string(), Input::from(TLP_CREATED));
        inputs.insert("definition_type".to_string(), Input::from("tlp"));
        if version != crate::common::V20 {
            inputs.insert("name".to_string(), Input::from(format!("TLP:{}", self.as_str().to_uppercase())));
        }
        inputs.insert(
            "definition".to_string(),
            Input::from(json!({ "tlp": self.as_str() })),
        );
        registry.construct("marking-definition", Some(version), inputs)
    }
}

impl Display for TlpLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "TLP:{}", self.as_str().to_uppercase())
    }
}
