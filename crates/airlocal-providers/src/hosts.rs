//! Hosts file edits with privilege elevation
//!
//! The hosts file is only writable by root. Unless already root, the editor
//! re-invokes the airlocal binary's `hosts add|remove` helper through sudo so
//! the password prompt happens in the user's terminal.

use std::process::Stdio;

use airlocal_core::hostsfile::{system_hosts_path, HostsFile};
use airlocal_core::provision::HostsEditor;
use airlocal_core::LOOPBACK;
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::utils::{command_exists, needs_sudo};

/// Direction of a hosts file edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostsAction {
    Add,
    Remove,
}

impl HostsAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// Apply an edit to a hosts file in-process; the caller needs write access
///
/// Returns the number of hostnames added or removed.
pub fn edit_hosts_file(path: &Utf8Path, action: HostsAction, hosts: &[String]) -> Result<usize> {
    let mut file = HostsFile::load(path)?;
    let changed = match action {
        HostsAction::Add => file.add(LOOPBACK, hosts).len(),
        HostsAction::Remove => file.remove(LOOPBACK, hosts),
    };

    if changed > 0 {
        file.save(path)?;
    }
    debug!("{} {} host(s) in {}", action.as_str(), changed, path);
    Ok(changed)
}

/// [`HostsEditor`] that elevates through sudo when needed
pub struct SudoHostsEditor {
    helper: Utf8PathBuf,
    hosts_file: Utf8PathBuf,
}

impl SudoHostsEditor {
    /// `helper` is the airlocal executable providing the `hosts` subcommand
    pub fn new(helper: impl Into<Utf8PathBuf>) -> Self {
        Self {
            helper: helper.into(),
            hosts_file: system_hosts_path(),
        }
    }

    /// Arguments passed to sudo for an edit
    pub fn sudo_args(&self, action: HostsAction, hosts: &[String]) -> Vec<String> {
        let mut args = vec![
            self.helper.to_string(),
            "hosts".to_string(),
            action.as_str().to_string(),
        ];
        args.extend(hosts.iter().cloned());
        args
    }

    async fn apply(&self, action: HostsAction, hosts: &[String]) -> Result<()> {
        if hosts.is_empty() {
            return Ok(());
        }

        if !needs_sudo().await {
            edit_hosts_file(&self.hosts_file, action, hosts)?;
            return Ok(());
        }

        if !command_exists("sudo") {
            return Err(Error::tool_not_found("sudo"));
        }

        let args = self.sudo_args(action, hosts);
        info!("Running with sudo: {}", args.join(" "));
        let status = Command::new("sudo")
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: format!("sudo {}", args.join(" ")),
                status: status.to_string(),
                stderr: String::new(),
            })
        }
    }
}

#[async_trait]
impl HostsEditor for SudoHostsEditor {
    async fn add(&self, hosts: &[String]) -> anyhow::Result<()> {
        self.apply(HostsAction::Add, hosts).await?;
        Ok(())
    }

    async fn remove(&self, hosts: &[String]) -> anyhow::Result<()> {
        self.apply(HostsAction::Remove, hosts).await?;
        Ok(())
    }
}
