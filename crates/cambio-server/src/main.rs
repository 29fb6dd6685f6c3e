use std::process::ExitCode;
use std::sync::Arc;

use cambio_core::{Aggregator, ReqwestHttpClient};
use cambio_server::cli::Cli;
use cambio_server::error::ServerError;
use cambio_server::{router, AppState};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,cambio_core=info,cambio_server=info";

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is the normal case in deployment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "cambio stopped");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let cli = Cli::parse();
    let config = cli.aggregator_config()?;

    if config.banxico_token.is_none() {
        warn!("BANXICO_API_KEY is not set; series, trend and annual sections will be empty");
    }
    if config.exchangerate_key.is_none() {
        warn!("EXCHANGERATE_API_KEY is not set; regional section will be empty");
    }
    info!(?config, "configuration loaded");

    let aggregator = Aggregator::from_config(config, Arc::new(ReqwestHttpClient::new()))?;
    let app = router(AppState::new(aggregator), cli.request_timeout());

    let address = cli.listen_address();
    let listener = TcpListener::bind(&address).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::InvalidInput {
            ServerError::ListenAddress {
                value: address.clone(),
            }
        } else {
            ServerError::Io(err)
        }
    })?;
    info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
