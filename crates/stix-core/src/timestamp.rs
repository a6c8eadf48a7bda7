//! STIX timestamps
//!
//! [`Timestamp`] is a UTC instant tagged with the precision its property
//! declares, so formatting is a property of the value itself.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

/// Sub-second precision a timestamp property is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// Fraction shown only when non-zero
    #[default]
    Any,
    /// Whole seconds
    Second,
    /// Milliseconds
    Millisecond,
}

/// Whether the precision is an exact width or a minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrecisionConstraint {
    /// Truncate to the precision
    Exact,
    /// Show at least the precision, more digits if present
    #[default]
    Min,
}

/// Errors while parsing timestamp text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// Text is a date-time without a timezone designator
    #[error("timestamp '{0}' has no timezone")]
    MissingTimezone(String),

    /// Text could not be parsed as RFC 3339
    #[error("cannot parse timestamp '{text}': {reason}")]
    Unparseable { text: String, reason: String },
}

/// A UTC instant with its rendering precision
///
/// Stored with microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    instant: DateTime<Utc>,
    precision: Precision,
    constraint: PrecisionConstraint,
}

impl Timestamp {
    /// Create from an instant, truncating as the precision requires
    #[must_use]
    pub fn from_datetime(
        instant: DateTime<Utc>,
        precision: Precision,
        constraint: PrecisionConstraint,
    ) -> Self {
        // A leap second folds onto the preceding second.
        let micros = instant.timestamp_subsec_micros() % 1_000_000;
        let nanos = match (precision, constraint) {
            (Precision::Second, PrecisionConstraint::Exact) => 0,
            (Precision::Millisecond, PrecisionConstraint::Exact) => (micros / 1000) * 1_000_000,
            _ => micros * 1000,
        };
        Self {
            instant: instant.with_nanosecond(nanos).unwrap_or(instant),
            precision,
            constraint,
        }
    }

    /// Current instant
    #[must_use]
    pub fn now(precision: Precision, constraint: PrecisionConstraint) -> Self {
        Self::from_datetime(Utc::now(), precision, constraint)
    }

    /// Parse RFC 3339 text (`Z` or numeric offset) into UTC
    ///
    /// # Errors
    /// Returns error on text without a timezone, on a leap second, or on text
    /// that cannot be parsed
    pub fn parse(
        text: &str,
        precision: Precision,
        constraint: PrecisionConstraint,
    ) -> Result<Self, TimestampError> {
        match DateTime::parse_from_rfc3339(text) {
            Ok(parsed) if parsed.nanosecond() >= 1_000_000_000 => Err(TimestampError::Unparseable {
                text: text.to_string(),
                reason: "leap seconds are not supported".to_string(),
            }),
            Ok(parsed) => Ok(Self::from_datetime(
                parsed.with_timezone(&Utc),
                precision,
                constraint,
            )),
            Err(e) => {
                if NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok() {
                    Err(TimestampError::MissingTimezone(text.to_string()))
                } else {
                    Err(TimestampError::Unparseable {
                        text: text.to_string(),
                        reason: e.to_string(),
                    })
                }
            }
        }
    }

    /// Same instant rendered with another precision
    #[inline]
    #[must_use]
    pub fn with_precision(self, precision: Precision, constraint: PrecisionConstraint) -> Self {
        Self::from_datetime(self.instant, precision, constraint)
    }

    /// Underlying instant
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.instant
    }

    /// Declared precision
    #[inline]
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Checks if this timestamp is before another.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.instant < other.instant
    }

    /// Checks if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.instant > other.instant
    }

    /// Canonical `YYYY-MM-DDThh:mm:ss[.fff]Z` text
    #[must_use]
    pub fn to_stix_string(&self) -> String {
        let base = self.instant.format("%Y-%m-%dT%H:%M:%S");
        let micros = self.instant.timestamp_subsec_micros();
        let digits = format!("{micros:06}");
        let trimmed = digits.trim_end_matches('0');

        let fraction = match (self.precision, self.constraint) {
            (Precision::Second, PrecisionConstraint::Exact) => String::new(),
            (Precision::Millisecond, PrecisionConstraint::Exact) => format!(".{}", &digits[..3]),
            (Precision::Millisecond, PrecisionConstraint::Min) => {
                if trimmed.len() <= 3 {
                    format!(".{}", &digits[..3])
                } else {
                    format!(".{trimmed}")
                }
            }
            (Precision::Any | Precision::Second, _) => {
                if trimmed.is_empty() {
                    String::new()
                } else {
                    format!(".{trimmed}")
                }
            }
        };

        format!("{base}{fraction}Z")
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_stix_string())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_stix_string())
    }
}
