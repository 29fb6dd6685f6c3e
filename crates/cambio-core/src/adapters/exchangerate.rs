use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::data_source::{RateSnapshot, RateSnapshotSource, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, MAX_TIMEOUT_MS};
use crate::{CurrencyCode, ObservationDate, ProviderId, SectionError};

pub const DEFAULT_EXCHANGERATE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Commercial USD-based snapshot adapter (ExchangeRate-API v6).
#[derive(Clone)]
pub struct ExchangeRateApiAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    api_key: Option<String>,
    base_currency: CurrencyCode,
    timeout_ms: u64,
}

impl ExchangeRateApiAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_EXCHANGERATE_URL),
            api_key: api_key.filter(|value| !value.trim().is_empty()),
            base_currency: CurrencyCode::usd(),
            timeout_ms: MAX_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms.min(MAX_TIMEOUT_MS);
        self
    }

    async fn fetch(&self, path: String) -> Result<RateSnapshot, SectionError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SectionError::MissingConfiguration {
                name: "EXCHANGERATE_API_KEY",
            });
        };

        debug!(url = %format!("{}/***/{path}", self.base_url), "requesting rate snapshot");
        let endpoint = format!("{}/{api_key}/{path}", self.base_url);
        let request = HttpRequest::get(endpoint).with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SectionError::unavailable(
                ProviderId::ExchangeRateApi,
                format!("transport error: {}", e.message()),
            )
        })?;

        if !response.is_success() {
            return Err(SectionError::unavailable(
                ProviderId::ExchangeRateApi,
                format!("upstream returned status {}", response.status),
            ));
        }

        parse_snapshot(&response.body)
    }
}

impl RateSnapshotSource for ExchangeRateApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::ExchangeRateApi
    }

    fn latest<'a>(&'a self) -> SourceFuture<'a, RateSnapshot> {
        Box::pin(self.fetch(format!("latest/{}", self.base_currency)))
    }

    fn on_date<'a>(&'a self, date: ObservationDate) -> SourceFuture<'a, RateSnapshot> {
        let date = date.into_inner();
        Box::pin(self.fetch(format!(
            "history/{}/{}/{}/{}",
            self.base_currency,
            date.year(),
            u8::from(date.month()),
            date.day()
        )))
    }
}

#[derive(Debug, Deserialize)]
struct RatesBody {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_rates: Option<BTreeMap<String, f64>>,
}

pub(crate) fn parse_snapshot(body: &str) -> Result<RateSnapshot, SectionError> {
    let parsed: RatesBody = serde_json::from_str(body).map_err(|e| {
        SectionError::unavailable(
            ProviderId::ExchangeRateApi,
            format!("malformed rates body: {e}"),
        )
    })?;

    if parsed.result.as_deref() == Some("error") {
        return Err(SectionError::unavailable(
            ProviderId::ExchangeRateApi,
            format!(
                "upstream error: {}",
                parsed.error_type.as_deref().unwrap_or("unknown")
            ),
        ));
    }

    parsed.conversion_rates.ok_or_else(|| {
        SectionError::unavailable(ProviderId::ExchangeRateApi, "missing conversion_rates")
    })
}
