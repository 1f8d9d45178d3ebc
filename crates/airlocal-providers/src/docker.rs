//! Docker runtime: shared resources and per-environment compose lifecycle

use std::fs;
use std::process::Output;

use airlocal_core::compose::COMPOSE_FILE_NAME;
use airlocal_core::provision::ContainerRuntime;
use airlocal_core::templates::global_file;
use airlocal_core::{CACHE_VOLUME, SHARED_NETWORK};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::utils::{run_checked, run_command_async};

/// Thin wrapper over the docker CLI
#[derive(Debug, Clone)]
pub struct Docker {
    program: String,
}

impl Default for Docker {
    fn default() -> Self {
        Self::new()
    }
}

impl Docker {
    pub fn new() -> Self {
        Self::with_program("docker")
    }

    /// Use a specific docker executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run a docker subcommand, failing on non-zero exit
    pub async fn run(&self, args: &[&str]) -> Result<Output> {
        run_checked(&self.program, args).await
    }

    /// Run a docker subcommand, returning whatever it exits with
    pub async fn try_run(&self, args: &[&str]) -> Result<Output> {
        run_command_async(&self.program, args).await
    }

    /// Run `docker compose -f <file> <args>`
    pub async fn compose(&self, compose_file: &Utf8Path, args: &[&str]) -> Result<Output> {
        let mut full = vec!["compose", "-f", compose_file.as_str()];
        full.extend_from_slice(args);
        self.run(&full).await
    }

    /// Run a command inside a service of a compose project
    pub async fn compose_exec(
        &self,
        compose_file: &Utf8Path,
        service: &str,
        user: Option<&str>,
        command: &[&str],
    ) -> Result<Output> {
        let mut args = vec!["exec", "-T"];
        if let Some(user) = user {
            args.extend(["--user", user]);
        }
        args.push(service);
        args.extend_from_slice(command);
        self.compose(compose_file, &args).await
    }
}

/// [`ContainerRuntime`] backed by docker and docker compose
pub struct DockerRuntime {
    docker: Docker,
    global_dir: Utf8PathBuf,
}

impl DockerRuntime {
    /// Runtime writing the global compose file under `<config_dir>/global`
    pub fn new(config_dir: impl Into<Utf8PathBuf>) -> Self {
        Self::with_docker(Docker::new(), config_dir)
    }

    pub fn with_docker(docker: Docker, config_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            docker,
            global_dir: config_dir.into().join("global"),
        }
    }

    pub fn global_compose_file(&self) -> Utf8PathBuf {
        self.global_dir.join(COMPOSE_FILE_NAME)
    }

    async fn ensure_network(&self) -> Result<()> {
        let inspect = self
            .docker
            .try_run(&["network", "inspect", SHARED_NETWORK])
            .await?;
        if inspect.status.success() {
            debug!("Network {} already exists", SHARED_NETWORK);
            return Ok(());
        }

        info!("Creating network {}", SHARED_NETWORK);
        self.docker
            .run(&["network", "create", SHARED_NETWORK])
            .await?;
        Ok(())
    }

    async fn ensure_cache_volume(&self) -> Result<()> {
        let inspect = self
            .docker
            .try_run(&["volume", "inspect", CACHE_VOLUME])
            .await?;
        if inspect.status.success() {
            debug!("Volume {} already exists", CACHE_VOLUME);
            return Ok(());
        }

        info!("Creating volume {}", CACHE_VOLUME);
        self.docker.run(&["volume", "create", CACHE_VOLUME]).await?;
        Ok(())
    }

    /// Write the embedded global compose file, replacing an older copy
    fn write_global_compose(&self) -> Result<Utf8PathBuf> {
        fs::create_dir_all(&self.global_dir)?;
        let path = self.global_compose_file();
        fs::write(&path, global_file(COMPOSE_FILE_NAME)?)?;
        debug!("Wrote global services to {}", path);
        Ok(path)
    }
}

fn env_compose_file(env_dir: &Utf8Path) -> Utf8PathBuf {
    env_dir.join(COMPOSE_FILE_NAME)
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn is_available(&self) -> bool {
        match self.docker.try_run(&["system", "info"]).await {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!("docker not runnable: {}", e);
                false
            }
        }
    }

    async fn ensure_shared(&self) -> anyhow::Result<()> {
        self.ensure_network().await?;
        self.ensure_cache_volume().await?;

        let global = self.write_global_compose()?;
        info!("Starting global services");
        self.docker.compose(&global, &["up", "-d"]).await?;
        Ok(())
    }

    async fn up(&self, env_dir: &Utf8Path) -> anyhow::Result<()> {
        self.docker
            .compose(&env_compose_file(env_dir), &["up", "-d"])
            .await?;
        Ok(())
    }

    async fn down(&self, env_dir: &Utf8Path) -> anyhow::Result<()> {
        self.docker
            .compose(&env_compose_file(env_dir), &["down"])
            .await?;
        Ok(())
    }

    async fn restart(&self, env_dir: &Utf8Path) -> anyhow::Result<()> {
        self.docker
            .compose(&env_compose_file(env_dir), &["restart"])
            .await?;
        Ok(())
    }

    async fn clear_cache(&self) -> anyhow::Result<()> {
        let removed = self.docker.try_run(&["volume", "rm", CACHE_VOLUME]).await?;
        if !removed.status.success() {
            debug!("Volume {} was not removed", CACHE_VOLUME);
        }
        self.docker.run(&["volume", "create", CACHE_VOLUME]).await?;
        info!("Recreated volume {}", CACHE_VOLUME);
        Ok(())
    }
}
