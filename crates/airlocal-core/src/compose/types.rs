//! Docker Compose file format types
//!
//! Only the subset of the v3 format the generated environments use. Maps are
//! ordered so that serializing the same document always yields the same text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Root structure of a docker-compose.yml file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeDocument {
    /// Compose file format version
    pub version: String,

    /// Services to be created
    pub services: BTreeMap<String, Service>,

    /// Networks
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, NetworkDefinition>,

    /// Named volumes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: BTreeMap<String, VolumeDefinition>,
}

/// A service in a docker-compose file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Container image to use
    pub image: String,

    /// Ports exposed to linked services
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expose: Vec<String>,

    /// Volume mounts (e.g., ["./data:/data", "db:/var/lib/db"])
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,

    /// Services this service depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Networks to connect to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,

    /// DNS servers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,

    /// Environment variables
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl Service {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }
}

/// Reference to a resource created outside the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRef {
    pub name: String,
}

/// Top-level network entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalRef>,
}

impl NetworkDefinition {
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            external: Some(ExternalRef { name: name.into() }),
        }
    }
}

/// Top-level volume entry; serializes as `{}` for a local volume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalRef>,
}

impl VolumeDefinition {
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            external: Some(ExternalRef { name: name.into() }),
        }
    }
}

/// Source of a named volume mount, None for bind mounts
fn named_volume(mount: &str) -> Option<&str> {
    let source = mount.split(':').next()?;
    let is_bind = source.is_empty()
        || source.starts_with('.')
        || source.starts_with('/')
        || source.starts_with('~')
        || source.contains('/');
    (!is_bind).then_some(source)
}

impl ComposeDocument {
    /// Check that every reference inside the document resolves
    pub fn validate(&self) -> Result<()> {
        for (name, service) in &self.services {
            for dep in &service.depends_on {
                if !self.services.contains_key(dep) {
                    return Err(Error::invalid_document(format!(
                        "service '{}' depends on undefined service '{}'",
                        name, dep
                    )));
                }
            }

            for mount in &service.volumes {
                if let Some(volume) = named_volume(mount) {
                    if !self.volumes.contains_key(volume) {
                        return Err(Error::invalid_document(format!(
                            "service '{}' mounts undeclared volume '{}'",
                            name, volume
                        )));
                    }
                }
            }

            for network in &service.networks {
                if network != "default" && !self.networks.contains_key(network) {
                    return Err(Error::invalid_document(format!(
                        "service '{}' joins undeclared network '{}'",
                        name, network
                    )));
                }
            }
        }

        Ok(())
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Names of all services
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }
}
