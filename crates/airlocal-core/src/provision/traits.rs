//! Collaborator traits for the side effects of provisioning
//!
//! Implementations live in `airlocal-providers`; tests use recording mocks.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use camino::Utf8Path;

use crate::types::WordPressInstall;

/// Container runtime driving docker compose
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Check that the runtime daemon answers
    async fn is_available(&self) -> bool;

    /// Make sure the shared network, cache volume and global services exist
    ///
    /// Must be idempotent.
    async fn ensure_shared(&self) -> Result<()>;

    /// Bring up the services of an environment
    async fn up(&self, env_dir: &Utf8Path) -> Result<()>;

    /// Stop and remove the services of an environment
    async fn down(&self, env_dir: &Utf8Path) -> Result<()>;

    async fn restart(&self, env_dir: &Utf8Path) -> Result<()>;

    /// Drop and recreate the shared cache volume
    async fn clear_cache(&self) -> Result<()>;
}

/// Administration of the shared MySQL server
#[async_trait]
pub trait DatabaseAdmin: Send + Sync {
    async fn create(&self, name: &str) -> Result<()>;

    /// Grant the application user all privileges on a database
    async fn grant(&self, name: &str) -> Result<()>;

    async fn delete(&self, name: &str) -> Result<()>;
}

/// WordPress installation inside a running environment
#[async_trait]
pub trait CmsInstaller: Send + Sync {
    async fn download(&self, env_dir: &Utf8Path) -> Result<()>;

    /// Check out the core development repository instead of a release
    async fn download_develop(&self, env_dir: &Utf8Path) -> Result<()>;

    /// Write wp-config.php pointing at database `db_name`
    async fn configure(&self, env_dir: &Utf8Path, db_name: &str) -> Result<()>;

    async fn install(&self, env_dir: &Utf8Path, host: &str, install: &WordPressInstall)
        -> Result<()>;

    async fn set_rewrites(&self, env_dir: &Utf8Path) -> Result<()>;

    /// Remove sample posts, bundled plugins and default widgets
    async fn empty_content(&self, env_dir: &Utf8Path) -> Result<()>;
}

/// Privileged editing of the system hosts file
#[async_trait]
pub trait HostsEditor: Send + Sync {
    async fn add(&self, hosts: &[String]) -> Result<()>;

    async fn remove(&self, hosts: &[String]) -> Result<()>;
}

/// Collaborators shared by the orchestrator and the environment manager
#[derive(Clone)]
pub struct Collaborators {
    pub runtime: Arc<dyn ContainerRuntime>,
    pub database: Arc<dyn DatabaseAdmin>,
    pub cms: Arc<dyn CmsInstaller>,
    pub hosts: Arc<dyn HostsEditor>,
}
