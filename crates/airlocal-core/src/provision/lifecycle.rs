//! Start, stop, restart and delete of existing environments

use std::fs;

use tracing::{debug, info, warn};

use super::traits::Collaborators;
use crate::compose::COMPOSE_FILE_NAME;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::hostname::env_slug;
use crate::registry::{EnvironmentRegistry, EnvironmentState};

/// Outcome of deleting one environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub slug: String,
    pub removed_hosts: Vec<String>,
    pub warnings: Vec<String>,
}

/// Manages environments that already exist on disk
pub struct EnvironmentManager {
    registry: EnvironmentRegistry,
    manage_hosts: bool,
    collaborators: Collaborators,
}

impl EnvironmentManager {
    pub fn new(settings: &Settings, collaborators: Collaborators) -> Self {
        Self::with_registry(
            EnvironmentRegistry::new(settings.sites_path.clone()),
            settings.manage_hosts,
            collaborators,
        )
    }

    pub fn with_registry(
        registry: EnvironmentRegistry,
        manage_hosts: bool,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            registry,
            manage_hosts,
            collaborators,
        }
    }

    pub fn registry(&self) -> &EnvironmentRegistry {
        &self.registry
    }

    /// Slug of a managed environment given its slug or any spelling of its hostname
    pub fn resolve(&self, name: &str) -> Result<String> {
        let slug = env_slug(name)?;
        match self.registry.state(&slug) {
            EnvironmentState::Managed => Ok(slug),
            _ => Err(Error::environment_not_found(name)),
        }
    }

    /// Like [`resolve`](Self::resolve), but also accepts incomplete directories
    pub fn resolve_for_delete(&self, name: &str) -> Result<String> {
        let slug = env_slug(name)?;
        match self.registry.state(&slug) {
            EnvironmentState::Missing => Err(Error::environment_not_found(name)),
            _ => Ok(slug),
        }
    }

    pub async fn start(&self, slug: &str) -> Result<()> {
        self.collaborators
            .runtime
            .ensure_shared()
            .await
            .map_err(|e| Error::lifecycle_failed("start", "shared services", e))?;

        info!("Starting {}", slug);
        self.collaborators
            .runtime
            .up(&self.registry.path_for(slug))
            .await
            .map_err(|e| Error::lifecycle_failed("start", slug, e))
    }

    pub async fn stop(&self, slug: &str) -> Result<()> {
        info!("Stopping {}", slug);
        self.collaborators
            .runtime
            .down(&self.registry.path_for(slug))
            .await
            .map_err(|e| Error::lifecycle_failed("stop", slug, e))
    }

    pub async fn restart(&self, slug: &str) -> Result<()> {
        info!("Restarting {}", slug);
        self.collaborators
            .runtime
            .restart(&self.registry.path_for(slug))
            .await
            .map_err(|e| Error::lifecycle_failed("restart", slug, e))
    }

    /// Start every managed environment, returning the slugs started
    pub async fn start_all(&self) -> Result<Vec<String>> {
        let slugs = self.registry.list_environments()?;
        for slug in &slugs {
            self.start(slug).await?;
        }
        Ok(slugs)
    }

    pub async fn stop_all(&self) -> Result<Vec<String>> {
        let slugs = self.registry.list_environments()?;
        for slug in &slugs {
            self.stop(slug).await?;
        }
        Ok(slugs)
    }

    pub async fn restart_all(&self) -> Result<Vec<String>> {
        let slugs = self.registry.list_environments()?;
        for slug in &slugs {
            self.restart(slug).await?;
        }
        Ok(slugs)
    }

    /// Remove an environment, complete or not
    ///
    /// Containers, database and hosts entries are removed best-effort; only
    /// failing to remove the directory is an error.
    pub async fn delete(&self, slug: &str) -> Result<DeleteReport> {
        if self.registry.state(slug) == EnvironmentState::Missing {
            return Err(Error::environment_not_found(slug));
        }
        let path = self.registry.path_for(slug);

        // Read before the directory, and the descriptor with it, goes away
        let hosts = self.registry.hosts_for(slug);
        let mut report = DeleteReport {
            slug: slug.to_string(),
            ..DeleteReport::default()
        };

        if path.join(COMPOSE_FILE_NAME).exists() {
            info!("Stopping {}", slug);
            if let Err(e) = self.collaborators.runtime.down(&path).await {
                report.push_warning(format!("Could not stop containers: {:#}", e));
            }
        } else {
            debug!("No {} in {}, skipping compose down", COMPOSE_FILE_NAME, path);
        }

        info!("Removing files of {}", slug);
        fs::remove_dir_all(&path).map_err(|e| Error::lifecycle_failed("delete", slug, e))?;

        info!("Dropping database {}", slug);
        if let Err(e) = self.collaborators.database.delete(slug).await {
            report.push_warning(format!("Could not drop database: {:#}", e));
        }

        if self.manage_hosts && !hosts.is_empty() {
            info!("Removing hosts file entries for {}", slug);
            match self.collaborators.hosts.remove(&hosts).await {
                Ok(()) => report.removed_hosts = hosts,
                Err(e) => report.push_warning(format!("Could not remove hosts entries: {:#}", e)),
            }
        }

        Ok(report)
    }

    /// Delete every managed environment
    pub async fn delete_all(&self) -> Result<Vec<DeleteReport>> {
        let mut reports = Vec::new();
        for slug in self.registry.list_environments()? {
            reports.push(self.delete(&slug).await?);
        }
        Ok(reports)
    }

    /// Recreate the shared cache volume
    pub async fn clear_cache(&self) -> Result<()> {
        self.collaborators
            .runtime
            .clear_cache()
            .await
            .map_err(|e| Error::lifecycle_failed("clear", "cache volume", e))
    }
}

impl DeleteReport {
    fn push_warning(&mut self, message: String) {
        warn!("{}: {}", self.slug, message);
        self.warnings.push(message);
    }
}
