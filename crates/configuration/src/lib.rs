//! Configuration for the gateway: where the warehouse lives, how to authenticate against it,
//! and where the KML overlays are served from.

pub mod configuration;
pub mod connection_settings;
pub mod environment;
pub mod error;
pub mod values;
pub mod version1;

pub use configuration::{make_runtime_configuration, Configuration, ResolvedServiceKey};
pub use error::{ConfigurationError, ParseConfigurationError, WriteParsedConfigurationError};
pub use version1::{parse_configuration, write_parsed_configuration, ParsedConfiguration};
