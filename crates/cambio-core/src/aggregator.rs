//! Response assembly for `/tipo-cambio`.
//!
//! One [`Aggregator::aggregate`] call issues the upstream reads concurrently
//! (snapshot, daily window, annual window, regional snapshot), then derives
//! each section independently. A section whose inputs failed is left out of
//! the result; nothing here fails the whole response.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::{BanxicoAdapter, ExchangeRateApiAdapter};
use crate::cleaner::clean;
use crate::data_source::{RateSnapshotSource, SeriesRequest, SeriesSource};
use crate::http_client::HttpClient;
use crate::merger::{merge, SeriesSnapshot};
use crate::monitor::{monitor, MonitorBlock};
use crate::regional::{compare_regional, fetch_regional, RegionalComparison, RegionalSnapshots};
use crate::trend::{annual_context, daily_trend, round_to, AnnualContext, DailyTrend};
use crate::{
    AggregatorConfig, DataPoint, DateRange, ObservationDate, SectionError, SeriesId,
    ValidationError,
};

/// Top-level response body. Series names sit next to the fixed section keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedResult {
    #[serde(flatten)]
    pub series: SeriesSnapshot,
    #[serde(rename = "REGIONAL", skip_serializing_if = "Option::is_none")]
    pub regional: Option<RegionalComparison>,
    #[serde(rename = "DAILY_TREND", skip_serializing_if = "Option::is_none")]
    pub daily_trend: Option<DailyTrend>,
    #[serde(rename = "ANNUAL_CONTEXT", skip_serializing_if = "Option::is_none")]
    pub annual_context: Option<AnnualContext>,
    #[serde(rename = "MONITOR", skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorBlock>,
}

impl AggregatedResult {
    /// Keys present in the serialized body, series first.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.series.keys().map(ToString::to_string).collect();
        let sections = [
            ("REGIONAL", self.regional.is_some()),
            ("DAILY_TREND", self.daily_trend.is_some()),
            ("ANNUAL_CONTEXT", self.annual_context.is_some()),
            ("MONITOR", self.monitor.is_some()),
        ];
        keys.extend(
            sections
                .into_iter()
                .filter(|(_, present)| *present)
                .map(|(key, _)| String::from(key)),
        );
        keys
    }
}

/// Stateless pipeline over two upstream sources and a shared configuration.
#[derive(Clone)]
pub struct Aggregator {
    config: Arc<AggregatorConfig>,
    series_source: Arc<dyn SeriesSource>,
    rate_source: Arc<dyn RateSnapshotSource>,
}

impl Aggregator {
    pub fn new(
        config: Arc<AggregatorConfig>,
        series_source: Arc<dyn SeriesSource>,
        rate_source: Arc<dyn RateSnapshotSource>,
    ) -> Self {
        Self {
            config,
            series_source,
            rate_source,
        }
    }

    /// Validates the configuration and wires both production adapters onto
    /// one transport.
    pub fn from_config(
        config: AggregatorConfig,
        http_client: Arc<dyn HttpClient>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;

        let banxico = BanxicoAdapter::new(Arc::clone(&http_client), config.banxico_token.clone())
            .with_base_url(config.banxico_url.clone())
            .with_timeout_ms(config.timeout_ms);
        let exchangerate = ExchangeRateApiAdapter::new(http_client, config.exchangerate_key.clone())
            .with_base_url(config.exchangerate_url.clone())
            .with_timeout_ms(config.timeout_ms);

        Ok(Self::new(
            Arc::new(config),
            Arc::new(banxico),
            Arc::new(exchangerate),
        ))
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub async fn aggregate(&self, today: ObservationDate) -> AggregatedResult {
        let sections = self.config.sections;
        let (snapshot, regional, daily, annual_window) = tokio::join!(
            self.fetch_snapshot(today),
            when(sections.regional || sections.monitor, self.fetch_regional(today)),
            when(sections.daily_trend, self.fetch_daily_history(today)),
            when(sections.annual_context, self.fetch_annual_window(today)),
        );

        let mut result = AggregatedResult::default();
        let reference = &self.config.reference_series;

        match snapshot {
            Ok(series) => result.series = series,
            Err(error) => omitted("series", &error),
        }
        let current_reference = result.series.get(reference).map(|point| point.value);

        let regional = regional.map(|snapshots| {
            snapshots.unwrap_or_else(|error| {
                omitted("REGIONAL", &error);
                RegionalSnapshots::default()
            })
        });

        if sections.regional {
            let snapshots = regional.clone().unwrap_or_default();
            result.regional = Some(compare_regional(&self.config.regional_currencies, &snapshots));
        }

        if let Some(history) = daily {
            match history.and_then(|points| {
                daily_trend(reference.clone(), points, self.config.trend_window)
            }) {
                Ok(trend) => result.daily_trend = Some(trend),
                Err(error) => omitted("DAILY_TREND", &error),
            }
        }

        if let Some(window) = annual_window {
            match window
                .and_then(|points| annual_context(reference.clone(), points, current_reference))
            {
                Ok(context) => result.annual_context = Some(context),
                Err(error) => omitted("ANNUAL_CONTEXT", &error),
            }
        }

        if sections.monitor {
            // Same rounding as the REGIONAL entry for this currency.
            let regional_value = regional.as_ref().and_then(|snapshots| {
                snapshots
                    .current
                    .get(self.config.monitor_currency.as_str())
                    .map(|value| round_to(*value, 4))
            });
            match (current_reference, regional_value) {
                (Some(official), Some(regional)) => {
                    result.monitor = Some(monitor(
                        official,
                        regional,
                        self.config.alert_threshold_cents,
                    ));
                }
                (official, regional) => omitted(
                    "MONITOR",
                    &SectionError::InsufficientData {
                        required: 2,
                        available: usize::from(official.is_some()) + usize::from(regional.is_some()),
                    },
                ),
            }
        }

        info!(
            today = %today,
            sections = ?result.keys(),
            "aggregated exchange-rate response"
        );
        result
    }

    async fn fetch_snapshot(&self, today: ObservationDate) -> Result<SeriesSnapshot, SectionError> {
        let range = self
            .config
            .windows
            .snapshot_lookback_days
            .map(|days| DateRange::trailing(today, days));
        let request = SeriesRequest::new(self.config.catalog.ids(), range)
            .map_err(|_| SectionError::MissingConfiguration { name: "series catalog" })?;

        let blocks = self.series_source.fetch_series(request).await?;
        Ok(merge(&blocks, &self.config.catalog))
    }

    async fn fetch_regional(
        &self,
        today: ObservationDate,
    ) -> Result<RegionalSnapshots, SectionError> {
        let prior_date = self
            .config
            .sections
            .regional_history
            .then(|| today.days_before(self.config.windows.regional_prior_offset_days));
        fetch_regional(self.rate_source.as_ref(), prior_date).await
    }

    async fn fetch_daily_history(
        &self,
        today: ObservationDate,
    ) -> Result<Vec<DataPoint>, SectionError> {
        let range = DateRange::trailing(today, self.config.windows.daily_lookback_days);
        self.fetch_reference_window(range).await
    }

    async fn fetch_annual_window(
        &self,
        today: ObservationDate,
    ) -> Result<Vec<DataPoint>, SectionError> {
        let windows = self.config.windows;
        let target = today.days_before(windows.annual_offset_days);
        self.fetch_reference_window(DateRange::trailing(target, windows.annual_margin_days))
            .await
    }

    /// Cleaned observations of the reference series within `range`.
    async fn fetch_reference_window(
        &self,
        range: DateRange,
    ) -> Result<Vec<DataPoint>, SectionError> {
        let id = self.reference_id()?;
        let request = SeriesRequest::in_range(vec![id.clone()], range)
            .map_err(|_| SectionError::MissingConfiguration { name: "reference series" })?;

        let blocks = self.series_source.fetch_series(request).await?;
        Ok(blocks
            .iter()
            .find(|block| block.id == id.as_str())
            .map(|block| clean(&block.observations))
            .unwrap_or_default())
    }

    fn reference_id(&self) -> Result<&SeriesId, SectionError> {
        self.config
            .catalog
            .id_for(&self.config.reference_series)
            .ok_or(SectionError::MissingConfiguration {
                name: "reference series",
            })
    }
}

async fn when<F: Future>(enabled: bool, future: F) -> Option<F::Output> {
    if enabled {
        Some(future.await)
    } else {
        None
    }
}

fn omitted(section: &str, error: &SectionError) {
    warn!(section, code = error.code(), %error, "section omitted from response");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{FixtureHttpClient, HttpResponse};
    use crate::SeriesName;

    const TODAY: &str = "2026-10-18";

    fn today() -> ObservationDate {
        ObservationDate::parse(TODAY).expect("date")
    }

    fn aggregator(client: FixtureHttpClient, config: AggregatorConfig) -> Aggregator {
        Aggregator::from_config(config, Arc::new(client)).expect("valid config")
    }

    fn configured() -> AggregatorConfig {
        AggregatorConfig {
            banxico_url: String::from("https://sie.test/series"),
            banxico_token: Some(String::from("tok")),
            exchangerate_url: String::from("https://rates.test/v6"),
            exchangerate_key: Some(String::from("key")),
            ..AggregatorConfig::default()
        }
    }

    #[test]
    fn result_keys_follow_present_sections() {
        let mut result = AggregatedResult::default();
        result.series.insert(
            SeriesName::parse("EUR").expect("name"),
            DataPoint::new(today(), 21.0),
        );
        result.regional = Some(RegionalComparison::new());
        assert_eq!(result.keys(), vec![String::from("EUR"), String::from("REGIONAL")]);
    }

    #[tokio::test]
    async fn disabled_sections_issue_no_upstream_calls() {
        let client = Arc::new(FixtureHttpClient::new().respond(
            "/datos/",
            HttpResponse::ok_json(r#"{"bmx":{"series":[]}}"#),
        ));
        let mut config = configured();
        config.sections.regional = false;
        config.sections.monitor = false;
        config.sections.daily_trend = false;
        config.sections.annual_context = false;

        let aggregator = Aggregator::from_config(config, client.clone()).expect("valid config");
        let result = aggregator.aggregate(today()).await;

        assert_eq!(client.requests().len(), 1);
        assert!(result.regional.is_none());
        assert!(result.keys().is_empty());
    }

    #[tokio::test]
    async fn snapshot_uses_oportuno_when_lookback_is_disabled() {
        let client = Arc::new(FixtureHttpClient::new().respond(
            "/datos/oportuno",
            HttpResponse::ok_json(
                r#"{"bmx":{"series":[{"idSerie":"SF43718","datos":[{"fecha":"16/10/2026","dato":"18.3900"}]}]}}"#,
            ),
        ));
        let mut config = configured();
        config.windows.snapshot_lookback_days = None;
        config.sections = crate::Sections {
            regional: false,
            regional_history: false,
            daily_trend: false,
            annual_context: false,
            monitor: false,
        };

        let aggregator = Aggregator::from_config(config, client.clone()).expect("valid config");
        let result = aggregator.aggregate(today()).await;

        let fix = SeriesName::parse("USD_FIX").expect("name");
        assert_eq!(result.series[&fix].value, 18.39);
        assert!(client.requests()[0].url.ends_with("/datos/oportuno"));
    }

    #[tokio::test]
    async fn regional_failure_degrades_to_empty_section() {
        let client = FixtureHttpClient::new()
            .respond("/datos/", HttpResponse::ok_json(r#"{"bmx":{"series":[]}}"#))
            .respond("/latest/", HttpResponse::new(503, "down"));
        let result = aggregator(client, configured()).aggregate(today()).await;

        assert_eq!(result.regional, Some(RegionalComparison::new()));
        assert!(result.monitor.is_none());
    }
}
