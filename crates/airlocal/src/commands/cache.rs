//! Cache command

use airlocal_core::provision::EnvironmentManager;
use anyhow::Result;

use crate::cli::CacheCommands;
use crate::commands::{collaborators, load_config, require_docker};
use crate::output;

pub async fn run(command: CacheCommands) -> Result<()> {
    match command {
        CacheCommands::Clear => {
            let store = load_config()?;
            let collaborators = collaborators(&store)?;
            require_docker(&collaborators).await?;
            let manager = EnvironmentManager::new(&store.settings()?, collaborators);

            let spinner = output::spinner("Clearing cache volume...");
            let result = manager.clear_cache().await;
            spinner.finish_and_clear();
            result?;
            output::success("Cache cleared");
        }
    }
    Ok(())
}
