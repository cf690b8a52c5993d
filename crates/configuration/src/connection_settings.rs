//! Warehouse connection settings.

use crate::values::{DatasetId, Location, ProjectId, Secret, ServiceKey};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVICE_KEY_JSON_VARIABLE: &str = "GCP_SERVICE_ACCOUNT_JSON";
pub const DEFAULT_SERVICE_KEY_FILE_VARIABLE: &str = "GCP_KEY_JSON_BIG_QUERY";
pub const DEFAULT_PROJECT_ID_VARIABLE: &str = "GCP_PROJECT_ID";
pub const DEFAULT_DATASET_ID_VARIABLE: &str = "BQ_DATASET";
pub const DEFAULT_LOCATION_VARIABLE: &str = "BQ_LOCATION";

/// Warehouse connection settings.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConnectionSettings {
    /// Service account used to authenticate against BigQuery.
    pub service_key: ServiceKey,
    /// Project ID for a BigQuery database.
    pub project_id: ProjectId,
    /// Dataset ID for a BigQuery database.
    pub dataset_id: DatasetId,
    /// Location query jobs run in. Jobs run in the dataset's default location when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl DatabaseConnectionSettings {
    pub fn empty() -> Self {
        Self {
            service_key: ServiceKey {
                json: Some(Secret::from_environment(DEFAULT_SERVICE_KEY_JSON_VARIABLE)),
                file: Some(Secret::from_environment(DEFAULT_SERVICE_KEY_FILE_VARIABLE)),
            },
            project_id: ProjectId(Secret::from_environment(DEFAULT_PROJECT_ID_VARIABLE)),
            dataset_id: DatasetId(Secret::from_environment(DEFAULT_DATASET_ID_VARIABLE)),
            location: Some(Location(Secret::from_environment(
                DEFAULT_LOCATION_VARIABLE,
            ))),
        }
    }
}
