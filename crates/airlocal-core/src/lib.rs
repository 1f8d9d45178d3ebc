//! # airlocal-core
//!
//! Core library for the airlocal CLI providing:
//! - Persisted key/value configuration with built-in defaults
//! - Hostname parsing and slug derivation
//! - docker-compose document generation from creation answers
//! - Environment registry backed by the `.config.json` marker file
//! - Hosts file line editing
//! - The provisioning orchestrator and environment lifecycle, written
//!   against collaborator traits implemented in `airlocal-providers`

pub mod compose;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod hostname;
pub mod hostsfile;
pub mod provision;
pub mod questions;
pub mod registry;
pub mod templates;
pub mod types;
pub mod utils;

pub use compose::{ComposeBuilder, ComposeDocument};
pub use config::{ConfigStore, Settings};
pub use descriptor::EnvironmentDescriptor;
pub use error::{Error, Result};
pub use registry::{EnvironmentRegistry, EnvironmentState};
pub use types::{Answers, Environment, HostSet, InstallType, PhpVersion};
pub use utils::get_home_dir;

/// Name of the external docker network shared by every environment
pub const SHARED_NETWORK: &str = "airlocaldocker";

/// Named volume mounted into containers for wp-cli and npm caches
pub const CACHE_VOLUME: &str = "airlocalCache";

/// Loopback address every managed hostname resolves to
pub const LOOPBACK: &str = "127.0.0.1";
