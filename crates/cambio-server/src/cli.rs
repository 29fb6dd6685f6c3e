//! Command-line and environment configuration for the `cambio` binary.
//!
//! Every flag has an environment fallback so the service can be configured
//! entirely through the process environment (or a `.env` file).
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--port` | `PORT` | `8080` |
//! | `--host` | `HOST` | `0.0.0.0` |
//! | `--banxico-token` | `BANXICO_API_KEY` | unset |
//! | `--exchangerate-key` | `EXCHANGERATE_API_KEY` | unset |
//! | `--timeout-ms` | `CAMBIO_TIMEOUT_MS` | `10000` |
//! | `--request-timeout-ms` | `CAMBIO_REQUEST_TIMEOUT_MS` | `25000` |
//!
//! # Examples
//!
//! ```bash
//! # Serve with keys from the environment
//! BANXICO_API_KEY=... EXCHANGERATE_API_KEY=... cambio
//!
//! # Override the catalog and skip the annual section
//! cambio --series USD_FIX=SF43718 --series EUR=SF46410 --disable-section annual_context
//! ```

use std::time::Duration;

use cambio_core::{
    AggregatorConfig, CurrencyCode, Section, SeriesCatalog, SeriesName, ValidationError,
    DEFAULT_ALERT_THRESHOLD_CENTS, DEFAULT_BANXICO_URL, DEFAULT_EXCHANGERATE_URL, MAX_TIMEOUT_MS,
};
use clap::Parser;

/// Exchange-rate aggregation service
///
/// Serves `GET /tipo-cambio`, combining Banxico SIE series with
/// ExchangeRate-API regional quotes into a single JSON document.
#[derive(Debug, Clone, Parser)]
#[command(name = "cambio", author, version, about = "Exchange-rate aggregation service")]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Banxico SIE token sent as the `Bmx-Token` header.
    #[arg(long, env = "BANXICO_API_KEY", hide_env_values = true)]
    pub banxico_token: Option<String>,

    /// ExchangeRate-API key. Without it the regional section is empty.
    #[arg(long, env = "EXCHANGERATE_API_KEY", hide_env_values = true)]
    pub exchangerate_key: Option<String>,

    #[arg(long, env = "CAMBIO_BANXICO_URL", default_value = DEFAULT_BANXICO_URL)]
    pub banxico_url: String,

    #[arg(long, env = "CAMBIO_EXCHANGERATE_URL", default_value = DEFAULT_EXCHANGERATE_URL)]
    pub exchangerate_url: String,

    /// Per-call upstream timeout in milliseconds (max 10000).
    #[arg(long, env = "CAMBIO_TIMEOUT_MS", default_value_t = MAX_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Overall budget for one `/tipo-cambio` request in milliseconds.
    #[arg(long, env = "CAMBIO_REQUEST_TIMEOUT_MS", default_value_t = 25_000)]
    pub request_timeout_ms: u64,

    /// Compare regional quotes against the previous day.
    #[arg(long)]
    pub regional_history: bool,

    /// Section to skip: regional, daily_trend, annual_context, monitor.
    #[arg(long = "disable-section", value_name = "SECTION")]
    pub disabled_sections: Vec<Section>,

    /// Catalog entry `NAME=ID`. When given, replaces the default catalog.
    #[arg(long = "series", value_name = "NAME=ID")]
    pub series: Vec<String>,

    /// Regional currencies, comma separated.
    #[arg(long, value_delimiter = ',', default_value = "MXN,BRL,COP,CLP,CAD,CHF")]
    pub currencies: Vec<String>,

    /// Series used for trend, annual context and monitor.
    #[arg(long, default_value = "USD_FIX")]
    pub reference_series: String,

    /// Regional quote compared against the reference series.
    #[arg(long, default_value = "MXN")]
    pub monitor_currency: String,

    #[arg(long, default_value_t = DEFAULT_ALERT_THRESHOLD_CENTS)]
    pub alert_threshold_cents: f64,

    /// Number of values kept in the daily trend history.
    #[arg(long, default_value_t = 5)]
    pub trend_window: usize,

    /// UTC offset, in hours, that decides the current date.
    #[arg(long, default_value_t = -6, allow_hyphen_values = true)]
    pub utc_offset_hours: i8,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds and validates the aggregator configuration.
    pub fn aggregator_config(&self) -> Result<AggregatorConfig, ValidationError> {
        let mut config = AggregatorConfig {
            banxico_url: self.banxico_url.clone(),
            banxico_token: self.banxico_token.clone(),
            exchangerate_url: self.exchangerate_url.clone(),
            exchangerate_key: self.exchangerate_key.clone(),
            timeout_ms: self.timeout_ms,
            regional_currencies: self
                .currencies
                .iter()
                .filter(|code| !code.trim().is_empty())
                .map(|code| CurrencyCode::parse(code))
                .collect::<Result<Vec<_>, _>>()?,
            reference_series: SeriesName::parse(&self.reference_series)?,
            monitor_currency: CurrencyCode::parse(&self.monitor_currency)?,
            alert_threshold_cents: self.alert_threshold_cents,
            trend_window: self.trend_window,
            utc_offset_hours: self.utc_offset_hours,
            ..AggregatorConfig::default()
        };

        if !self.series.is_empty() {
            config.catalog = SeriesCatalog::from_pairs(&self.series)?;
        }

        config.sections.regional_history = self.regional_history;
        for section in &self.disabled_sections {
            config.sections.set(*section, false);
        }

        config.validate()?;
        Ok(config)
    }
}
