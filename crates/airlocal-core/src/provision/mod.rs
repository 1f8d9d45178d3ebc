//! Environment provisioning and lifecycle
//!
//! The orchestrator owns the creation sequence and its failure policy; the
//! side effects themselves go through the collaborator traits in [`traits`].

mod lifecycle;
mod orchestrator;
pub mod traits;

pub use lifecycle::{DeleteReport, EnvironmentManager};
pub use orchestrator::{ProvisionReport, ProvisionWarning, ProvisioningOrchestrator};
pub use traits::{CmsInstaller, Collaborators, ContainerRuntime, DatabaseAdmin, HostsEditor};

use std::fmt;

/// Steps of the creation sequence that run after the duplicate check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    SharedResources,
    Files,
    Document,
    MediaProxy,
    Database,
    Containers,
    WordPress,
    Hosts,
    Descriptor,
}

impl Step {
    /// Whether a failure of this step aborts provisioning
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MediaProxy | Self::Hosts)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SharedResources => "Starting shared services",
            Self::Files => "Copying configuration files",
            Self::Document => "Writing docker-compose.yml",
            Self::MediaProxy => "Configuring media proxy",
            Self::Database => "Creating database",
            Self::Containers => "Starting containers",
            Self::WordPress => "Installing WordPress",
            Self::Hosts => "Adding hosts file entries",
            Self::Descriptor => "Writing environment descriptor",
        };
        f.write_str(name)
    }
}
