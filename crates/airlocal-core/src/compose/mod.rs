//! docker-compose document model and the builder that derives it from answers

mod builder;
mod types;

pub use builder::{nginx_config_name, wp_cli_config_name, ComposeBuilder};
pub use types::{ComposeDocument, ExternalRef, NetworkDefinition, Service, VolumeDefinition};

/// File name of the generated document inside an environment directory
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";
