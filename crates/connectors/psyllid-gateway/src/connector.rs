//! Setting up the gateway: configuration, then state.
//!
//! The routes are defined in [`crate::routes`].

use std::path::{Path, PathBuf};

use tracing::{info_span, Instrument};

use psyllid_gateway_configuration as configuration;
use psyllid_gateway_configuration::environment::Environment;

use super::state::{self, ServerState};

/// Builds the gateway from the environment it is started in.
pub struct GatewaySetup<Env: Environment> {
    environment: Env,
}

impl<Env: Environment> GatewaySetup<Env> {
    pub fn new(environment: Env) -> Self {
        Self { environment }
    }

    /// Read the configuration from `configuration_dir`, or from the default environment
    /// variables when there is none, and resolve its secrets.
    pub async fn parse_configuration(
        &self,
        configuration_dir: Option<&Path>,
        kml_directory: Option<PathBuf>,
    ) -> anyhow::Result<configuration::Configuration> {
        let parsed_configuration = match configuration_dir {
            Some(dir) => {
                configuration::parse_configuration(dir)
                    .instrument(info_span!("parse configuration"))
                    .await?
            }
            None => configuration::ParsedConfiguration::initial(),
        };

        let mut runtime_configuration =
            configuration::make_runtime_configuration(parsed_configuration, &self.environment)?;
        if let Some(kml_directory) = kml_directory {
            runtime_configuration.kml_directory = kml_directory;
        }

        Ok(runtime_configuration)
    }

    /// Authenticate against the warehouse and set up the shared state.
    pub async fn try_init_state(
        &self,
        configuration: &configuration::Configuration,
    ) -> Result<ServerState, state::InitializationError> {
        state::create_state(configuration)
            .instrument(info_span!("Initialise state"))
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "Initialization error");
                err
            })
    }
}
