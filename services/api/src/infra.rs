use costsheet::config::AppConfig;
use costsheet::error::AppError;
use costsheet::workflows::catalog::{Catalog, CatalogClient, CatalogSnapshot};
use costsheet::workflows::export::DocumentExporter;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Catalog,
    pub(crate) exporter: Arc<DocumentExporter>,
    pub(crate) support_contact: Arc<str>,
}

impl AppState {
    pub(crate) fn new(
        config: &AppConfig,
        catalog: Catalog,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            catalog,
            exporter: Arc::new(DocumentExporter::from_config(&config.export)),
            support_contact: Arc::from(config.support_contact.as_str()),
        }
    }
}

/// Live catalog unless spreadsheet exports are supplied.
pub(crate) fn catalog_source(
    config: &AppConfig,
    projects_csv: Option<&Path>,
    inventory_csv: Option<&Path>,
) -> Result<Catalog, AppError> {
    if projects_csv.is_none() && inventory_csv.is_none() {
        let client = CatalogClient::from_config(&config.catalog)?;
        return Ok(Catalog::Remote(client));
    }
    let snapshot = CatalogSnapshot::from_csv_files(projects_csv, inventory_csv)?;
    Ok(Catalog::snapshot(snapshot))
}
