use serde::{Deserialize, Serialize};

use super::Secret;

/// Where to find the service account key. The inline JSON wins when both are available.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceKey {
    /// The whole service account key, as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Secret>,
    /// Path to a service account key file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Secret>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectId(pub Secret);

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatasetId(pub Secret);

impl From<String> for DatasetId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for DatasetId {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

/// Processing location for query jobs, e.g. `southamerica-east1`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Location(pub Secret);

impl From<String> for Location {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}
