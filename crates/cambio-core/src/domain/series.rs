use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Response keys owned by derived sections; series names may not reuse them.
pub const RESERVED_SECTION_KEYS: [&str; 4] = ["REGIONAL", "DAILY_TREND", "ANNUAL_CONTEXT", "MONITOR"];

/// Provider-assigned identifier of one time series (e.g. `SF43718`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeriesId(String);

impl SeriesId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySeriesId);
        }

        for (index, ch) in trimmed.chars().enumerate() {
            if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
                return Err(ValidationError::SeriesIdInvalidChar { ch, index });
            }
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SeriesId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SeriesId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SeriesId> for String {
    fn from(value: SeriesId) -> Self {
        value.0
    }
}

/// Stable display name of a series (e.g. `USD_FIX`).
///
/// Catalog names are validated; names produced by the raw-id fallback are
/// taken verbatim from the upstream payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String")]
pub struct SeriesName(String);

impl SeriesName {
    /// Parse and normalize a catalog name to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySeriesName);
        }

        let normalized = trimmed.to_ascii_uppercase();
        for (index, ch) in normalized.chars().enumerate() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                return Err(ValidationError::SeriesNameInvalidChar { ch, index });
            }
        }

        if RESERVED_SECTION_KEYS.contains(&normalized.as_str()) {
            return Err(ValidationError::ReservedSeriesName { value: normalized });
        }

        Ok(Self(normalized))
    }

    /// Display name for an id the catalog does not know.
    pub fn from_unresolved(raw_id: &str) -> Self {
        Self(raw_id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SeriesName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SeriesName> for String {
    fn from(value: SeriesName) -> Self {
        value.0
    }
}
