//! State shared by every request.
//!
//! This is initialized on startup.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info_span, Instrument};

use psyllid_gateway_configuration::{Configuration, ResolvedServiceKey};
use query_engine_execution::bigquery::BigQuery;
use query_engine_execution::metrics;
use query_engine_execution::warehouse::Warehouse;
use query_engine_metadata::metadata::Dataset;

/// State for the gateway. Cloned into every handler; nothing in it changes after startup.
#[derive(Clone)]
pub struct ServerState {
    pub dataset: Arc<Dataset>,
    pub kml_directory: Arc<PathBuf>,
    pub warehouse: Arc<dyn Warehouse>,
    pub metrics: metrics::Metrics,
    pub metrics_registry: prometheus::Registry,
}

impl ServerState {
    /// Wrap an already-connected warehouse.
    pub fn new(
        dataset: Dataset,
        kml_directory: PathBuf,
        warehouse: Arc<dyn Warehouse>,
    ) -> Result<Self, InitializationError> {
        let mut metrics_registry = prometheus::Registry::new();
        let metrics = metrics::Metrics::initialize(&mut metrics_registry)
            .map_err(InitializationError::MetricsError)?;

        Ok(ServerState {
            dataset: Arc::new(dataset),
            kml_directory: Arc::new(kml_directory),
            warehouse,
            metrics,
            metrics_registry,
        })
    }
}

/// Create the BigQuery client and wrap it inside the gateway's state.
pub async fn create_state(configuration: &Configuration) -> Result<ServerState, InitializationError> {
    let service_account_key = match &configuration.service_key {
        ResolvedServiceKey::Json(json) => yup_oauth2::parse_service_account_key(json)
            .map_err(InitializationError::InvalidServiceKey)?,
        ResolvedServiceKey::File(path) => yup_oauth2::read_service_account_key(path)
            .await
            .map_err(|err| InitializationError::UnreadableServiceKey(path.clone(), err))?,
    };

    // Init BigQuery client
    let bigquery_client = async {
        gcp_bigquery_client::Client::from_service_account_key(service_account_key, false).await
    }
    .instrument(info_span!("Create BigQuery client"))
    .await
    .map_err(|err| InitializationError::UnableToCreateClient(err.to_string()))?;

    let warehouse = BigQuery::new(
        bigquery_client,
        &configuration.project_id,
        configuration.location.clone(),
    );

    ServerState::new(
        configuration.dataset(),
        configuration.kml_directory.clone(),
        Arc::new(warehouse),
    )
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("invalid service account key: {0}")]
    InvalidServiceKey(std::io::Error),
    #[error("unable to read service account key from {path}: {1}", path = .0.display())]
    UnreadableServiceKey(PathBuf, std::io::Error),
    #[error("unable to create BigQuery client: {0}")]
    UnableToCreateClient(String),
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
}
