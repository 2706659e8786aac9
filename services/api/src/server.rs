use crate::cli::ServeArgs;
use crate::infra::{catalog_source, AppState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use costsheet::config::AppConfig;
use costsheet::error::AppError;
use costsheet::telemetry::{self, LogSink};
use std::sync::atomic::Ordering;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogSink::Stdout)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let catalog = catalog_source(&config, None, None)?;
    let app_state = AppState::new(&config, catalog, prometheus_handle);
    let readiness_flag = app_state.readiness.clone();

    let app = router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, catalog = %config.catalog.base_url, "cost sheet service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
