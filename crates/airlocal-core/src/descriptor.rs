//! The `.config.json` marker file written last during creation
//!
//! A directory under the sites root is a managed environment if and only if
//! this file exists and parses.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

use crate::error::Result;

/// Marker file name inside each environment directory
pub const DESCRIPTOR_FILE: &str = ".config.json";

/// Persisted record of an environment's hostnames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    #[serde(rename = "envHosts")]
    pub env_hosts: Vec<String>,
}

impl EnvironmentDescriptor {
    pub fn new(env_hosts: Vec<String>) -> Self {
        Self { env_hosts }
    }

    /// Path of the marker file for an environment directory
    pub fn path_in(env_dir: &Utf8Path) -> Utf8PathBuf {
        env_dir.join(DESCRIPTOR_FILE)
    }

    /// Read and parse the descriptor of an environment directory
    pub fn read(env_dir: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(Self::path_in(env_dir))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// The descriptor if present and well formed, None otherwise
    pub fn load_if_valid(env_dir: &Utf8Path) -> Option<Self> {
        match Self::read(env_dir) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                debug!("No valid descriptor in {}: {}", env_dir, e);
                None
            }
        }
    }

    /// Write the descriptor into an environment directory
    pub fn write(&self, env_dir: &Utf8Path) -> Result<()> {
        let path = Self::path_in(env_dir);
        fs::write(&path, serde_json::to_string(self)?)?;
        debug!("Wrote descriptor {}", path);
        Ok(())
    }
}
