//! # airlocal-providers
//!
//! Implementations of the `airlocal-core` collaborator traits backed by
//! external tools:
//! - [`DockerRuntime`]: shared network, cache volume, global services and
//!   per-environment `docker compose` lifecycle
//! - [`MySqlAdmin`]: databases on the shared MySQL service
//! - [`WpCliInstaller`]: WordPress install through WP-CLI in the phpfpm container
//! - [`SudoHostsEditor`]: hosts file edits through a privileged re-invocation

pub mod database;
pub mod docker;
pub mod error;
pub mod hosts;
pub mod utils;
pub mod wordpress;

pub use database::MySqlAdmin;
pub use docker::{Docker, DockerRuntime};
pub use error::{Error, Result};
pub use hosts::SudoHostsEditor;
pub use wordpress::WpCliInstaller;

use airlocal_core::provision::Collaborators;
use camino::Utf8PathBuf;
use std::sync::Arc;

/// Docker-backed collaborators for the orchestrator and environment manager
///
/// `config_dir` receives the global compose file; `helper` is the binary
/// re-invoked through sudo for hosts file edits.
pub fn docker_collaborators(config_dir: Utf8PathBuf, helper: Utf8PathBuf) -> Collaborators {
    let runtime = DockerRuntime::new(config_dir);
    let global_compose = runtime.global_compose_file();

    Collaborators {
        runtime: Arc::new(runtime),
        database: Arc::new(MySqlAdmin::new(global_compose)),
        cms: Arc::new(WpCliInstaller::new()),
        hosts: Arc::new(SudoHostsEditor::new(helper)),
    }
}
