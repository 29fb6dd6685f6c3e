use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::data_source::{SeriesRequest, SeriesSource, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, MAX_TIMEOUT_MS};
use crate::{ProviderId, RawObservation, RawSeriesBlock, SectionError};

pub const DEFAULT_BANXICO_URL: &str = "https://www.banxico.org.mx/SieAPIRest/service/v1/series";

const TOKEN_HEADER: &str = "Bmx-Token";

/// Central-bank SIE time-series adapter.
#[derive(Clone)]
pub struct BanxicoAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    token: Option<String>,
    timeout_ms: u64,
}

impl BanxicoAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, token: Option<String>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BANXICO_URL),
            token: token.filter(|value| !value.trim().is_empty()),
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

    fn endpoint(&self, req: &SeriesRequest) -> String {
        let ids = req
            .ids
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        match req.range {
            Some(range) => format!(
                "{}/{ids}/datos/{}/{}",
                self.base_url,
                range.start().format_iso(),
                range.end().format_iso()
            ),
            None => format!("{}/{ids}/datos/oportuno", self.base_url),
        }
    }

    async fn fetch(&self, req: SeriesRequest) -> Result<Vec<RawSeriesBlock>, SectionError> {
        let Some(token) = self.token.as_deref() else {
            return Err(SectionError::MissingConfiguration {
                name: "BANXICO_API_KEY",
            });
        };

        let endpoint = self.endpoint(&req);
        debug!(url = %endpoint, "requesting central-bank series");

        let request = HttpRequest::get(&endpoint)
            .with_header(TOKEN_HEADER, token)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SectionError::unavailable(
                ProviderId::Banxico,
                format!("transport error: {}", e.message()),
            )
        })?;

        if !response.is_success() {
            return Err(SectionError::unavailable(
                ProviderId::Banxico,
                format!("upstream returned status {}", response.status),
            ));
        }

        parse_series(&response.body)
    }
}

impl SeriesSource for BanxicoAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Banxico
    }

    fn fetch_series<'a>(&'a self, req: SeriesRequest) -> SourceFuture<'a, Vec<RawSeriesBlock>> {
        Box::pin(self.fetch(req))
    }
}

#[derive(Debug, Deserialize)]
struct SieEnvelope {
    bmx: SieBody,
}

#[derive(Debug, Deserialize)]
struct SieBody {
    series: Vec<SieSeries>,
}

#[derive(Debug, Deserialize)]
struct SieSeries {
    #[serde(rename = "idSerie")]
    id_serie: String,
    // Omitted by the provider when the range holds no observations.
    #[serde(default)]
    datos: Vec<SieDatum>,
}

#[derive(Debug, Deserialize)]
struct SieDatum {
    fecha: String,
    dato: String,
}

pub(crate) fn parse_series(body: &str) -> Result<Vec<RawSeriesBlock>, SectionError> {
    let envelope: SieEnvelope = serde_json::from_str(body).map_err(|e| {
        SectionError::unavailable(ProviderId::Banxico, format!("malformed series body: {e}"))
    })?;

    Ok(envelope
        .bmx
        .series
        .into_iter()
        .map(|series| {
            let observations = series
                .datos
                .into_iter()
                .map(|datum| RawObservation::new(datum.fecha, datum.dato))
                .collect();
            RawSeriesBlock::new(series.id_serie, observations)
        })
        .collect())
}
