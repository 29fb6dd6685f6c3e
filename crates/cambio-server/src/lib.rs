//! HTTP surface for cambio.
//!
//! - `GET /` plain-text liveness
//! - `GET /tipo-cambio` aggregated exchange-rate document
//!
//! Upstream failures never change the status code: the body simply lacks the
//! sections that could not be produced. The only non-200 outcome is the
//! overall request budget expiring (`408`).

pub mod cli;
pub mod error;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::routing::get;
use axum::{Json, Router};
use cambio_core::{AggregatedResult, Aggregator, ObservationDate};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

pub const LIVENESS_TEXT: &str = "cambio exchange-rate service is running";

type Clock = Arc<dyn Fn() -> ObservationDate + Send + Sync>;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    aggregator: Aggregator,
    clock: Clock,
}

impl AppState {
    /// Uses the configured UTC offset to decide the current date.
    pub fn new(aggregator: Aggregator) -> Self {
        let config_clock = aggregator.clone();
        Self {
            aggregator,
            clock: Arc::new(move || config_clock.config().today()),
        }
    }

    /// Pins the current date, for deterministic date windows.
    pub fn with_today(mut self, today: ObservationDate) -> Self {
        self.clock = Arc::new(move || today);
        self
    }
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/tipo-cambio", get(exchange_rates))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn exchange_rates(State(state): State<AppState>) -> Json<AggregatedResult> {
    let request_id = Uuid::new_v4();
    let today = (state.clock)();
    let span = tracing::info_span!("aggregate", %request_id, %today);

    let result = state.aggregator.aggregate(today).instrument(span).await;
    Json(result)
}
