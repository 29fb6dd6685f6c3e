use std::collections::BTreeMap;

use serde::Serialize;

use crate::data_source::{RateSnapshot, RateSnapshotSource};
use crate::trend::{percent_change, round_to};
use crate::{CurrencyCode, ObservationDate, SectionError};

/// Movement of a local currency quoted per USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionalDirection {
    /// More local currency per USD than before.
    Weakening,
    Strengthening,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalRate {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_value: Option<f64>,
    /// Absolute percentage movement, two decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<RegionalDirection>,
}

pub type RegionalComparison = BTreeMap<CurrencyCode, RegionalRate>;

/// Raw snapshots backing the regional section and the monitor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionalSnapshots {
    pub current: RateSnapshot,
    pub prior: Option<RateSnapshot>,
}

/// Fetches today's snapshot and, when `prior_date` is set, the snapshot for
/// that date. Both calls run concurrently; either failing fails the whole step.
pub async fn fetch_regional(
    source: &dyn RateSnapshotSource,
    prior_date: Option<ObservationDate>,
) -> Result<RegionalSnapshots, SectionError> {
    match prior_date {
        Some(date) => {
            let (current, prior) = tokio::join!(source.latest(), source.on_date(date));
            Ok(RegionalSnapshots {
                current: current?,
                prior: Some(prior?),
            })
        }
        None => Ok(RegionalSnapshots {
            current: source.latest().await?,
            prior: None,
        }),
    }
}

/// Per-currency value and, when a prior value exists, its movement.
/// Currencies absent from the current snapshot are left out.
pub fn compare_regional(
    currencies: &[CurrencyCode],
    snapshots: &RegionalSnapshots,
) -> RegionalComparison {
    currencies
        .iter()
        .filter_map(|code| {
            let current = *snapshots.current.get(code.as_str())?;
            let prior = snapshots
                .prior
                .as_ref()
                .and_then(|prior| prior.get(code.as_str()).copied());

            let diff = prior.and_then(|prior| percent_change(prior, current, "regional").ok());
            let rate = RegionalRate {
                value: round_to(current, 4),
                prior_value: prior.map(|prior| round_to(prior, 4)),
                pct_change: diff.map(|diff| round_to(diff.abs(), 2)),
                direction: diff.map(|diff| {
                    if diff > 0.0 {
                        RegionalDirection::Weakening
                    } else {
                        RegionalDirection::Strengthening
                    }
                }),
            };
            Some((code.clone(), rate))
        })
        .collect()
}
