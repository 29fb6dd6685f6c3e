use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Duration};

use crate::ValidationError;

/// Marker the central bank publishes for "no value exists yet".
pub const NOT_PUBLISHED: &str = "N/E";

/// Calendar date of one published observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationDate(Date);

impl ObservationDate {
    /// Accepts the provider's `DD/MM/YYYY` as well as ISO `YYYY-MM-DD`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let day_first = format_description!("[day]/[month]/[year]");
        let iso = format_description!("[year]-[month]-[day]");

        Date::parse(trimmed, day_first)
            .or_else(|_| Date::parse(trimmed, iso))
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn days_before(self, days: u32) -> Self {
        Self(self.0.saturating_sub(Duration::days(i64::from(days))))
    }

    pub fn format_iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Display for ObservationDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for ObservationDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for ObservationDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Inclusive date range for historical series requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: ObservationDate,
    end: ObservationDate,
}

impl DateRange {
    pub fn new(start: ObservationDate, end: ObservationDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedDateRange {
                start: start.format_iso(),
                end: end.format_iso(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window of `days` calendar days ending at `end`.
    pub fn trailing(end: ObservationDate, days: u32) -> Self {
        Self {
            start: end.days_before(days),
            end,
        }
    }

    pub const fn start(&self) -> ObservationDate {
        self.start
    }

    pub const fn end(&self) -> ObservationDate {
        self.end
    }
}

/// One entry of a provider series exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub date: String,
    pub value: String,
}

impl RawObservation {
    pub fn new(date: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            value: value.into(),
        }
    }

    /// True for the provider's "not available" markers.
    pub fn is_sentinel(&self) -> bool {
        let value = self.value.trim();
        value.is_empty() || value == NOT_PUBLISHED
    }

    /// Numeric value, tolerating thousands separators. `None` for sentinels
    /// and for anything that still fails to parse.
    pub fn numeric_value(&self) -> Option<f64> {
        if self.is_sentinel() {
            return None;
        }
        let normalized: String = self.value.trim().chars().filter(|ch| *ch != ',').collect();
        normalized.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    pub fn parsed_date(&self) -> Option<ObservationDate> {
        ObservationDate::parse(&self.date).ok()
    }
}

/// Raw per-series payload keyed by the provider's opaque id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSeriesBlock {
    pub id: String,
    pub observations: Vec<RawObservation>,
}

impl RawSeriesBlock {
    pub fn new(id: impl Into<String>, observations: Vec<RawObservation>) -> Self {
        Self {
            id: id.into(),
            observations,
        }
    }
}

/// Validated observation: parsed date and a finite numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub date: ObservationDate,
    pub value: f64,
}

impl DataPoint {
    pub const fn new(date: ObservationDate, value: f64) -> Self {
        Self { date, value }
    }
}
