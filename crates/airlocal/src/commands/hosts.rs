//! Hosts file helper, normally reached through sudo

use airlocal_core::hostname::parse_hostname;
use airlocal_core::hostsfile::system_hosts_path;
use airlocal_providers::hosts::{edit_hosts_file, HostsAction};
use anyhow::{Context, Result};

use crate::cli::HostsCommands;
use crate::output;

pub fn run(command: HostsCommands) -> Result<()> {
    let (action, hosts) = match command {
        HostsCommands::Add { hosts } => (HostsAction::Add, hosts),
        HostsCommands::Remove { hosts } => (HostsAction::Remove, hosts),
    };
    let hosts: Vec<String> = hosts
        .iter()
        .map(|h| parse_hostname(h))
        .filter(|h| !h.is_empty())
        .collect();

    let path = system_hosts_path();
    let changed = edit_hosts_file(&path, action, &hosts)
        .with_context(|| format!("Failed to update {}", path))?;

    match action {
        HostsAction::Add => output::success(&format!("Added {} host(s) to {}", changed, path)),
        HostsAction::Remove => {
            output::success(&format!("Removed {} host(s) from {}", changed, path))
        }
    }
    Ok(())
}
