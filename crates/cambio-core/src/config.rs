//! Process-wide aggregator configuration.
//!
//! Built once at startup, validated, then shared read-only (`Arc`) by every
//! request handler. Secrets are kept out of `Debug` output.

use std::fmt::{Debug, Formatter};
use std::str::FromStr;

use time::{OffsetDateTime, UtcOffset};

use crate::adapters::{DEFAULT_BANXICO_URL, DEFAULT_EXCHANGERATE_URL};
use crate::http_client::MAX_TIMEOUT_MS;
use crate::monitor::DEFAULT_ALERT_THRESHOLD_CENTS;
use crate::{CurrencyCode, ObservationDate, SeriesCatalog, SeriesName, ValidationError};

pub const DEFAULT_REGIONAL_CURRENCIES: [&str; 6] = ["MXN", "BRL", "COP", "CLP", "CAD", "CHF"];

/// Response section names accepted by [`Sections::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Regional,
    RegionalHistory,
    DailyTrend,
    AnnualContext,
    Monitor,
}

impl FromStr for Section {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "regional" => Ok(Self::Regional),
            "regional_history" => Ok(Self::RegionalHistory),
            "daily_trend" => Ok(Self::DailyTrend),
            "annual_context" => Ok(Self::AnnualContext),
            "monitor" => Ok(Self::Monitor),
            _ => Err(ValidationError::UnknownSection {
                value: value.to_owned(),
            }),
        }
    }
}

/// Which derived sections a request computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub regional: bool,
    /// Adds a prior-day snapshot to the regional section.
    pub regional_history: bool,
    pub daily_trend: bool,
    pub annual_context: bool,
    pub monitor: bool,
}

impl Sections {
    pub fn set(&mut self, section: Section, enabled: bool) {
        match section {
            Section::Regional => self.regional = enabled,
            Section::RegionalHistory => self.regional_history = enabled,
            Section::DailyTrend => self.daily_trend = enabled,
            Section::AnnualContext => self.annual_context = enabled,
            Section::Monitor => self.monitor = enabled,
        }
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            regional: true,
            regional_history: false,
            daily_trend: true,
            annual_context: true,
            monitor: true,
        }
    }
}

/// Calendar windows used when querying upstreams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindows {
    /// Days of lookback for the current snapshot; `None` uses the
    /// most-recent-only endpoint.
    pub snapshot_lookback_days: Option<u32>,
    pub daily_lookback_days: u32,
    pub annual_offset_days: u32,
    pub annual_margin_days: u32,
    pub regional_prior_offset_days: u32,
}

impl Default for DateWindows {
    fn default() -> Self {
        Self {
            snapshot_lookback_days: Some(5),
            daily_lookback_days: 12,
            annual_offset_days: 365,
            annual_margin_days: 7,
            regional_prior_offset_days: 1,
        }
    }
}

#[derive(Clone)]
pub struct AggregatorConfig {
    pub banxico_url: String,
    pub banxico_token: Option<String>,
    pub exchangerate_url: String,
    pub exchangerate_key: Option<String>,
    pub timeout_ms: u64,
    pub catalog: SeriesCatalog,
    pub regional_currencies: Vec<CurrencyCode>,
    /// Series used by the daily trend, annual context and monitor.
    pub reference_series: SeriesName,
    /// Regional quote compared against the reference series.
    pub monitor_currency: CurrencyCode,
    pub alert_threshold_cents: f64,
    pub trend_window: usize,
    /// Offset used to decide what "today" is for date windows.
    pub utc_offset_hours: i8,
    pub sections: Sections,
    pub windows: DateWindows,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            banxico_url: String::from(DEFAULT_BANXICO_URL),
            banxico_token: None,
            exchangerate_url: String::from(DEFAULT_EXCHANGERATE_URL),
            exchangerate_key: None,
            timeout_ms: MAX_TIMEOUT_MS,
            catalog: SeriesCatalog::default(),
            regional_currencies: DEFAULT_REGIONAL_CURRENCIES
                .iter()
                .filter_map(|code| CurrencyCode::parse(code).ok())
                .collect(),
            reference_series: SeriesName::from_unresolved("USD_FIX"),
            monitor_currency: CurrencyCode::parse("MXN")
                .unwrap_or_else(|_| CurrencyCode::usd()),
            alert_threshold_cents: DEFAULT_ALERT_THRESHOLD_CENTS,
            trend_window: 5,
            utc_offset_hours: -6,
            sections: Sections::default(),
            windows: DateWindows::default(),
        }
    }
}

impl AggregatorConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 {
            return Err(ValidationError::ZeroValue { field: "timeout_ms" });
        }
        if self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ValidationError::TimeoutTooLarge {
                value_ms: self.timeout_ms,
                max_ms: MAX_TIMEOUT_MS,
            });
        }
        if self.trend_window == 0 {
            return Err(ValidationError::ZeroValue {
                field: "trend_window",
            });
        }
        if self.catalog.is_empty() {
            return Err(ValidationError::EmptySeriesRequest);
        }
        if self.catalog.id_for(&self.reference_series).is_none() {
            return Err(ValidationError::InvalidCatalogEntry {
                value: format!("reference series '{}' is not catalogued", self.reference_series),
            });
        }
        if self.windows.daily_lookback_days == 0 {
            return Err(ValidationError::ZeroValue {
                field: "daily_lookback_days",
            });
        }
        self.utc_offset()?;
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<UtcOffset, ValidationError> {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0).map_err(|_| {
            ValidationError::InvalidUtcOffset {
                hours: self.utc_offset_hours,
            }
        })
    }

    /// Current calendar date at the configured offset.
    pub fn today(&self) -> ObservationDate {
        let offset = self.utc_offset().unwrap_or(UtcOffset::UTC);
        ObservationDate::from_date(OffsetDateTime::now_utc().to_offset(offset).date())
    }
}

impl Debug for AggregatorConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregatorConfig")
            .field("banxico_url", &self.banxico_url)
            .field("banxico_token", &self.banxico_token.as_ref().map(|_| "<redacted>"))
            .field("exchangerate_url", &self.exchangerate_url)
            .field(
                "exchangerate_key",
                &self.exchangerate_key.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout_ms", &self.timeout_ms)
            .field("series", &self.catalog.len())
            .field("regional_currencies", &self.regional_currencies)
            .field("reference_series", &self.reference_series)
            .field("monitor_currency", &self.monitor_currency)
            .field("alert_threshold_cents", &self.alert_threshold_cents)
            .field("trend_window", &self.trend_window)
            .field("utc_offset_hours", &self.utc_offset_hours)
            .field("sections", &self.sections)
            .field("windows", &self.windows)
            .finish()
    }
}
