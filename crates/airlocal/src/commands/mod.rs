//! CLI command implementations

pub mod cache;
pub mod configure;
pub mod create;
pub mod environment;
pub mod hosts;
pub mod list;

use airlocal_core::provision::Collaborators;
use airlocal_core::ConfigStore;
use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8PathBuf;
use tracing::debug;

/// Load settings, writing the defaults on first use
pub fn load_config() -> Result<ConfigStore> {
    let mut store = ConfigStore::load_default().context("Failed to load configuration")?;
    if !store.is_configured() {
        store
            .configure_defaults()
            .context("Failed to write default configuration")?;
        crate::output::info(&format!(
            "Wrote default configuration to {}. Run `airlocal configure` to change it",
            store.path()
        ));
    }
    Ok(store)
}

/// Docker-backed collaborators for a configuration
pub fn collaborators(store: &ConfigStore) -> Result<Collaborators> {
    let config_dir = store
        .path()
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", store.path()))?
        .to_owned();
    let helper = std::env::current_exe().context("Failed to locate the airlocal executable")?;
    let helper = Utf8PathBuf::from_path_buf(helper)
        .map_err(|p| anyhow!("Executable path is not valid UTF-8: {}", p.display()))?;

    debug!("Global services in {}, hosts helper {}", config_dir, helper);
    Ok(airlocal_providers::docker_collaborators(config_dir, helper))
}

/// Fail early with a readable message when the docker daemon is unreachable
pub async fn require_docker(collaborators: &Collaborators) -> Result<()> {
    if !collaborators.runtime.is_available().await {
        bail!("Docker does not appear to be running. Start Docker and try again");
    }
    Ok(())
}
