//! Engine configuration
//!
//! [`EngineConfig`] is owned by a [`TypeRegistry`](crate::TypeRegistry) and
//! applies to every construction and parse it performs. [`ParseOptions`]
//! overrides it for a single call.

use serde::{Deserialize, Serialize};

/// Spec version used when neither input nor caller names one
pub const DEFAULT_SPEC_VERSION: &str = "2.1";

/// Registry-wide engine settings
///
/// Deserializable with missing fields defaulted, so it can be read from
/// any serde format:
///
/// ```
/// use stix_core::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"allow_custom": true}"#).unwrap();
/// assert!(config.allow_custom);
/// assert_eq!(config.default_spec_version, "2.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Spec version for inputs that do not name one
    pub default_spec_version: String,
    /// Keep properties a schema does not declare instead of rejecting them
    pub allow_custom: bool,
    /// Accept non-RFC 4122 UUIDs in 2.1 identifiers
    pub interop: bool,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default spec version
    #[inline]
    #[must_use]
    pub fn with_default_spec_version(mut self, version: impl Into<String>) -> Self {
        self.default_spec_version = version.into();
        self
    }

    /// With custom properties allowed
    #[inline]
    #[must_use]
    pub fn with_allow_custom(mut self, allow: bool) -> Self {
        self.allow_custom = allow;
        self
    }

    /// With interop (lenient UUID) mode
    #[inline]
    #[must_use]
    pub fn with_interop(mut self, interop: bool) -> Self {
        self.interop = interop;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_spec_version: DEFAULT_SPEC_VERSION.to_string(),
            allow_custom: false,
            interop: false,
        }
    }
}

/// Per-call overrides for construction and parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Spec version used when the input does not carry one
    pub version: Option<String>,
    /// Override of [`EngineConfig::allow_custom`]
    pub allow_custom: Option<bool>,
}

impl ParseOptions {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_allow_custom(mut self, allow: bool) -> Self {
        self.allow_custom = Some(allow);
        self
    }
}
