//! Service entrypoint. With no argument: train-or-load the model, then serve HTTP.
//! `train`: fit on the configured CSV, overwrite the artifact and exit.

use appsec_risk_service::{api, config::ServiceConfig, logging::StructuredLogger, service::RiskService};
use std::sync::Arc;
use tracing::{info, warn};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = ServiceConfig::path_from_env();
    let (config, config_error) = match ServiceConfig::load(&config_path) {
        Ok(c) => (c, None),
        Err(e) => (ServiceConfig::default(), Some(e)),
    };

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(config = %config_path.display(), "AppSec risk service starting");
    if let Some(e) = config_error {
        warn!(error = %e, "config not applied; running with defaults");
    }

    let service = Arc::new(RiskService::new(config.clone()));

    match std::env::args().nth(1).as_deref() {
        None => {}
        Some("train") => {
            let svc = service.clone();
            let model = tokio::task::spawn_blocking(move || svc.train_and_persist(true)).await??;
            info!(
                rows = model.metadata().training_rows,
                columns = model.schema().len(),
                "training complete"
            );
            return Ok(());
        }
        Some(other) => anyhow::bail!("unknown command {other:?}; expected `train` or no argument"),
    }

    // Failure is logged inside and leaves the service up without a model.
    let svc = service.clone();
    if tokio::task::spawn_blocking(move || svc.initialize()).await?.is_err() {
        warn!("serving without a model; /predict will answer 503");
    }

    let app = api::app(service);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("AppSec risk service stopping");
    Ok(())
}
