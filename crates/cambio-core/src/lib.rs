//! Core pipeline for cambio.
//!
//! This crate contains:
//! - Series, currency and date models with validation
//! - Upstream adapters for Banxico SIE and ExchangeRate-API
//! - Cleaning, merging and trend/regional/monitor derivations
//! - The concurrent aggregator that assembles one response

pub mod adapters;
pub mod aggregator;
pub mod catalog;
pub mod cleaner;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod merger;
pub mod monitor;
pub mod regional;
pub mod source;
pub mod trend;

pub use adapters::{
    BanxicoAdapter, ExchangeRateApiAdapter, DEFAULT_BANXICO_URL, DEFAULT_EXCHANGERATE_URL,
};
pub use aggregator::{AggregatedResult, Aggregator};
pub use catalog::{SeriesCatalog, DEFAULT_SERIES};
pub use cleaner::{chronological, clean};
pub use config::{AggregatorConfig, DateWindows, Section, Sections, DEFAULT_REGIONAL_CURRENCIES};
pub use data_source::{RateSnapshot, RateSnapshotSource, SeriesRequest, SeriesSource, SourceFuture};
pub use domain::{
    CurrencyCode, DataPoint, DateRange, ObservationDate, RawObservation, RawSeriesBlock, SeriesId,
    SeriesName, NOT_PUBLISHED, RESERVED_SECTION_KEYS,
};
pub use error::{SectionError, ValidationError};
pub use http_client::{
    FixtureHttpClient, FixtureReply, HttpClient, HttpError, HttpRequest, HttpResponse,
    ReqwestHttpClient, MAX_TIMEOUT_MS,
};
pub use merger::{merge, SeriesSnapshot};
pub use monitor::{monitor, MonitorBlock, MonitorSense, DEFAULT_ALERT_THRESHOLD_CENTS};
pub use regional::{
    compare_regional, fetch_regional, RegionalComparison, RegionalDirection, RegionalRate,
    RegionalSnapshots,
};
pub use source::ProviderId;
pub use trend::{
    annual_context, daily_trend, format_pct, percent_change, round_to, AnnualContext, DailyTrend,
    Direction,
};
