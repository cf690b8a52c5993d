mod connection_info;
mod secret;

pub use connection_info::{DatasetId, Location, ProjectId, ServiceKey};
pub use secret::Secret;
