//! # Domain Models
//!
//! Canonical types shared by every stage of the aggregation pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SeriesId`] | Provider-assigned opaque series identifier |
//! | [`SeriesName`] | Stable display name mapped one-to-one to a [`SeriesId`] |
//! | [`CurrencyCode`] | ISO 4217 code used by the regional comparison |
//! | [`RawObservation`] | Dated value as received, possibly a sentinel |
//! | [`RawSeriesBlock`] | Raw observations for one series id |
//! | [`DataPoint`] | Cleaned observation with a numeric value |
//! | [`ObservationDate`] | Calendar date serialized as `YYYY-MM-DD` |
//! | [`DateRange`] | Inclusive request window |

mod currency;
mod observation;
mod series;

pub use currency::CurrencyCode;
pub use observation::{
    DataPoint, DateRange, ObservationDate, RawObservation, RawSeriesBlock, NOT_PUBLISHED,
};
pub use series::{SeriesId, SeriesName, RESERVED_SECTION_KEYS};
