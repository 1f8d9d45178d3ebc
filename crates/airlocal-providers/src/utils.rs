//! Process helpers shared by the providers

use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Check if a command is available in PATH
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Run a command asynchronously, capturing its output
///
/// A non-zero exit is logged but still returned as `Ok`.
pub async fn run_command_async(cmd: &str, args: &[&str]) -> Result<Output> {
    debug!("Running: {} {}", cmd, args.join(" "));

    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            "Command failed: {} {}\nStderr: {}",
            cmd,
            args.join(" "),
            stderr
        );
    }

    Ok(output)
}

/// Run a command and fail unless it exits successfully
pub async fn run_checked(cmd: &str, args: &[&str]) -> Result<Output> {
    let output = run_command_async(cmd, args).await?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(Error::command_failed(
            format!("{} {}", cmd, args.join(" ")),
            &output,
        ))
    }
}

/// True unless the current user is root
pub async fn needs_sudo() -> bool {
    match Command::new("whoami").output().await {
        Ok(output) => String::from_utf8_lossy(&output.stdout).trim() != "root",
        Err(_) => true,
    }
}
