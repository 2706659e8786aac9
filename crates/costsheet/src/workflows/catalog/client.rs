use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::record::{records_from_csv, CatalogRecord};
use crate::config::CatalogConfig;

/// Collections exposed by the catalog web app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEndpoint {
    Projects,
    Inventory,
    Project { id: String },
}

impl CatalogEndpoint {
    fn query(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Projects => vec![("endpoint", "projects")],
            Self::Inventory => vec![("endpoint", "inventory")],
            Self::Project { id } => vec![("endpoint", "project"), ("id", id.as_str())],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Inventory => "inventory",
            Self::Project { .. } => "project",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog url `{url}` is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unable to build catalog http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("catalog request for `{endpoint}` failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog returned {status} for `{endpoint}`")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("catalog response for `{endpoint}` is not a list of records: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("unable to read catalog export `{path}`: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// HTTP client for the spreadsheet-backed catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = Url::parse(base_url).map_err(|err| CatalogError::InvalidUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogError::Client)?;
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn endpoint_url(&self, endpoint: &CatalogEndpoint) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(endpoint.query());
        url
    }

    pub async fn try_fetch(
        &self,
        endpoint: &CatalogEndpoint,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let name = endpoint.name();
        let url = self.endpoint_url(endpoint);
        debug!(endpoint = name, %url, "fetching catalog records");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Request {
                endpoint: name,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                endpoint: name,
                status,
            });
        }

        response
            .json::<Vec<CatalogRecord>>()
            .await
            .map_err(|source| CatalogError::Decode {
                endpoint: name,
                source,
            })
    }

    /// Fetches records, treating any failure as an empty collection.
    pub async fn fetch(&self, endpoint: &CatalogEndpoint) -> Vec<CatalogRecord> {
        match self.try_fetch(endpoint).await {
            Ok(records) => records,
            Err(err) => {
                warn!(endpoint = endpoint.name(), error = %err, "catalog fetch failed");
                Vec::new()
            }
        }
    }
}

/// Records loaded up front, e.g. from a spreadsheet export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub projects: Vec<CatalogRecord>,
    pub inventory: Vec<CatalogRecord>,
}

impl CatalogSnapshot {
    pub fn from_csv_files(
        projects: Option<&Path>,
        inventory: Option<&Path>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            projects: projects.map(read_csv).transpose()?.unwrap_or_default(),
            inventory: inventory.map(read_csv).transpose()?.unwrap_or_default(),
        })
    }
}

fn read_csv(path: &Path) -> Result<Vec<CatalogRecord>, CatalogError> {
    let csv_error = |source| CatalogError::Csv {
        path: path.display().to_string(),
        source,
    };
    let file = std::fs::File::open(path).map_err(|err| csv_error(csv::Error::from(err)))?;
    records_from_csv(file).map_err(csv_error)
}

/// Where catalog records come from: the live API or a fixed snapshot.
#[derive(Debug, Clone)]
pub enum Catalog {
    Remote(CatalogClient),
    Snapshot(Arc<CatalogSnapshot>),
}

impl Catalog {
    pub fn snapshot(snapshot: CatalogSnapshot) -> Self {
        Self::Snapshot(Arc::new(snapshot))
    }

    pub async fn projects(&self) -> Vec<CatalogRecord> {
        match self {
            Self::Remote(client) => client.fetch(&CatalogEndpoint::Projects).await,
            Self::Snapshot(snapshot) => snapshot.projects.clone(),
        }
    }

    pub async fn inventory(&self) -> Vec<CatalogRecord> {
        match self {
            Self::Remote(client) => client.fetch(&CatalogEndpoint::Inventory).await,
            Self::Snapshot(snapshot) => snapshot.inventory.clone(),
        }
    }
}
