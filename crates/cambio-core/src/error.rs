use thiserror::Error;

use crate::ProviderId;

/// Validation and contract errors exposed by `cambio-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("series id cannot be empty")]
    EmptySeriesId,
    #[error("series id contains invalid character '{ch}' at index {index}")]
    SeriesIdInvalidChar { ch: char, index: usize },

    #[error("series name cannot be empty")]
    EmptySeriesName,
    #[error("series name contains invalid character '{ch}' at index {index}")]
    SeriesNameInvalidChar { ch: char, index: usize },
    #[error("series name '{value}' collides with a response section key")]
    ReservedSeriesName { value: String },

    #[error("catalog maps series name '{name}' more than once")]
    DuplicateSeriesName { name: String },
    #[error("catalog maps series id '{id}' more than once")]
    DuplicateSeriesId { id: String },
    #[error("catalog entry must look like NAME=ID: '{value}'")]
    InvalidCatalogEntry { value: String },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("date must be YYYY-MM-DD or DD/MM/YYYY: '{value}'")]
    InvalidDate { value: String },
    #[error("date range start {start} is after end {end}")]
    InvertedDateRange { start: String, end: String },

    #[error("series request must include at least one series id")]
    EmptySeriesRequest,

    #[error("field '{field}' must be greater than zero")]
    ZeroValue { field: &'static str },
    #[error("timeout {value_ms}ms exceeds max {max_ms}ms")]
    TimeoutTooLarge { value_ms: u64, max_ms: u64 },
    #[error("unknown response section '{value}', expected one of regional, regional_history, daily_trend, annual_context, monitor")]
    UnknownSection { value: String },
    #[error("utc offset {hours}h is out of range")]
    InvalidUtcOffset { hours: i8 },
}

/// Reason a response section could not be produced.
///
/// None of these are fatal: the assembler drops the affected section and
/// keeps the rest of the response.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SectionError {
    #[error("{provider} unavailable: {message}")]
    UpstreamUnavailable {
        provider: ProviderId,
        message: String,
    },

    #[error("missing configuration: {name}")]
    MissingConfiguration { name: &'static str },

    #[error("insufficient data: need {required} valid points, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("zero denominator in {context}")]
    DivisionByZero { context: &'static str },
}

impl SectionError {
    pub fn unavailable(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            provider,
            message: message.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable { .. } => "section.upstream_unavailable",
            Self::MissingConfiguration { .. } => "section.missing_configuration",
            Self::InsufficientData { .. } => "section.insufficient_data",
            Self::DivisionByZero { .. } => "section.division_by_zero",
        }
    }
}
