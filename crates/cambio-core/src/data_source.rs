//! Upstream contracts consumed by the aggregation pipeline.
//!
//! | Contract | Request | Response | Implemented by |
//! |----------|---------|----------|----------------|
//! | [`SeriesSource`] | [`SeriesRequest`] | `Vec<RawSeriesBlock>` | [`BanxicoAdapter`](crate::BanxicoAdapter) |
//! | [`RateSnapshotSource`] | latest / by date | [`RateSnapshot`] | [`ExchangeRateApiAdapter`](crate::ExchangeRateApiAdapter) |
//!
//! Implementations never panic past this boundary: transport failures,
//! non-2xx statuses and malformed bodies all surface as
//! [`SectionError::UpstreamUnavailable`].

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::{
    DateRange, ObservationDate, ProviderId, RawSeriesBlock, SectionError, SeriesId,
    ValidationError,
};

/// Currency code to units of that currency per one unit of the base currency.
pub type RateSnapshot = BTreeMap<String, f64>;

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SectionError>> + Send + 'a>>;

/// Request payload for time-series endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub ids: Vec<SeriesId>,
    /// `None` asks for the most recent published value only.
    pub range: Option<DateRange>,
}

impl SeriesRequest {
    pub fn new(ids: Vec<SeriesId>, range: Option<DateRange>) -> Result<Self, ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::EmptySeriesRequest);
        }
        Ok(Self { ids, range })
    }

    pub fn latest(ids: Vec<SeriesId>) -> Result<Self, ValidationError> {
        Self::new(ids, None)
    }

    pub fn in_range(ids: Vec<SeriesId>, range: DateRange) -> Result<Self, ValidationError> {
        Self::new(ids, Some(range))
    }
}

/// Time-series provider keyed by opaque series ids.
pub trait SeriesSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetches raw blocks for the requested ids, one outbound call per invocation.
    fn fetch_series<'a>(&'a self, req: SeriesRequest) -> SourceFuture<'a, Vec<RawSeriesBlock>>;
}

/// Snapshot provider of USD-based conversion rates.
pub trait RateSnapshotSource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn latest<'a>(&'a self) -> SourceFuture<'a, RateSnapshot>;

    fn on_date<'a>(&'a self, date: ObservationDate) -> SourceFuture<'a, RateSnapshot>;
}
