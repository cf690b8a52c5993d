//! Configuration for the gateway at runtime.

use std::path::PathBuf;

use query_engine_metadata::metadata::Dataset;

use crate::connection_settings::{
    DEFAULT_SERVICE_KEY_FILE_VARIABLE, DEFAULT_SERVICE_KEY_JSON_VARIABLE,
};
use crate::environment::Environment;
use crate::error::ConfigurationError;
use crate::values::{Location, Secret, ServiceKey};
use crate::version1::ParsedConfiguration;

/// The 'Configuration' type collects all the information necessary to serve requests at runtime.
///
/// Every secret in a 'ParsedConfiguration' has been resolved against the environment.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub project_id: String,
    pub dataset_id: String,
    pub location: Option<String>,
    pub service_key: ResolvedServiceKey,
    pub kml_directory: PathBuf,
}

impl Configuration {
    pub fn dataset(&self) -> Dataset {
        Dataset::new(&self.project_id, &self.dataset_id)
    }
}

/// A service account key, either as its JSON contents or as the path of a key file.
#[derive(Clone, PartialEq, Eq)]
pub enum ResolvedServiceKey {
    Json(String),
    File(PathBuf),
}

// the key itself must never end up in logs.
impl std::fmt::Debug for ResolvedServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedServiceKey::Json(_) => write!(f, "Json(<redacted>)"),
            ResolvedServiceKey::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Resolve every secret in the parsed configuration.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, ConfigurationError> {
    let settings = parsed_config.connection_settings;

    let project_id = required(&settings.project_id.0, &environment, "project id")?;
    let dataset_id = required(&settings.dataset_id.0, &environment, "dataset id")?;
    let location = match &settings.location {
        Some(Location(secret)) => optional(secret, &environment)?,
        None => None,
    };
    let service_key = resolve_service_key(&settings.service_key, &environment)?;

    tracing::debug!(
        %project_id,
        %dataset_id,
        ?location,
        ?service_key,
        "resolved configuration"
    );

    Ok(Configuration {
        project_id,
        dataset_id,
        location,
        service_key,
        kml_directory: parsed_config.kml_directory,
    })
}

fn resolve_service_key(
    service_key: &ServiceKey,
    environment: &impl Environment,
) -> Result<ResolvedServiceKey, ConfigurationError> {
    if let Some(json) = &service_key.json {
        if let Some(value) = optional(json, environment)? {
            return Ok(ResolvedServiceKey::Json(value));
        }
    }
    if let Some(file) = &service_key.file {
        if let Some(value) = optional(file, environment)? {
            return Ok(ResolvedServiceKey::File(PathBuf::from(value)));
        }
    }

    let variable_name = |secret: &Option<Secret>, default: &str| match secret {
        Some(Secret::FromEnvironment { variable }) => variable.to_string(),
        _ => default.to_string(),
    };
    Err(ConfigurationError::MissingServiceKey {
        json_variable: variable_name(&service_key.json, DEFAULT_SERVICE_KEY_JSON_VARIABLE),
        file_variable: variable_name(&service_key.file, DEFAULT_SERVICE_KEY_FILE_VARIABLE),
    })
}

fn required(
    secret: &Secret,
    environment: &impl Environment,
    name: &'static str,
) -> Result<String, ConfigurationError> {
    let value = match secret {
        Secret::Plain(value) => value.clone(),
        Secret::FromEnvironment { variable } => environment.read(variable)?,
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigurationError::EmptyValue(name));
    }
    Ok(value.to_string())
}

fn optional(
    secret: &Secret,
    environment: &impl Environment,
) -> Result<Option<String>, ConfigurationError> {
    let value = match secret {
        Secret::Plain(value) if value.trim().is_empty() => None,
        Secret::Plain(value) => Some(value.clone()),
        Secret::FromEnvironment { variable } => environment.read_optional(variable)?,
    };
    Ok(value.map(|value| value.trim().to_string()))
}
