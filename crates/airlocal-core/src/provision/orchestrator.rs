//! Environment creation sequence

use std::fmt;
use std::fs;

use camino::Utf8Path;
use tracing::{debug, info, warn};

use super::traits::Collaborators;
use super::Step;
use crate::compose::{nginx_config_name, ComposeBuilder, COMPOSE_FILE_NAME};
use crate::config::Settings;
use crate::descriptor::EnvironmentDescriptor;
use crate::error::{Error, Result};
use crate::hostname::env_slug;
use crate::registry::{EnvironmentRegistry, EnvironmentState};
use crate::templates::{self, apply_media_proxy};
use crate::types::{Answers, Environment, InstallType, WordPressInstall};

/// A non-fatal step failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionWarning {
    pub step: Step,
    pub message: String,
}

impl fmt::Display for ProvisionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}

/// Outcome of a successful creation
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub environment: Environment,
    pub warnings: Vec<ProvisionWarning>,
    /// Follow-up instructions for the user
    pub notes: Vec<String>,
}

/// Creates environments
///
/// Runs strictly in sequence; each collaborator call is awaited before the
/// next step starts. Steps that fail after the duplicate check are not undone.
pub struct ProvisioningOrchestrator {
    registry: EnvironmentRegistry,
    manage_hosts: bool,
    collaborators: Collaborators,
}

impl ProvisioningOrchestrator {
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

    /// Create a new environment from questionnaire answers
    ///
    /// Answers are run through the questionnaire's input filters first, so
    /// answers read from a file behave like typed ones.
    pub async fn create(&self, answers: &Answers) -> Result<ProvisionReport> {
        let answers = &answers.normalized();

        // Everything that can be rejected is rejected before any I/O
        answers.validate()?;
        let install = answers.wordpress_install()?;
        let install_type = answers.install_type()?;
        let compose = ComposeBuilder::build(answers)?;
        compose.validate()?;

        let slug = env_slug(&answers.hostname)?;
        let path = self.registry.path_for(&slug);
        let hosts = answers.host_set();

        match self.registry.state(&slug) {
            EnvironmentState::Missing => {}
            EnvironmentState::Managed => {
                return Err(Error::environment_exists(&answers.hostname, path.as_str()));
            }
            EnvironmentState::Incomplete => {
                return Err(Error::incomplete_environment(
                    &answers.hostname,
                    path.as_str(),
                ));
            }
        }

        let environment = Environment {
            slug,
            path,
            hosts,
            compose,
        };
        let mut warnings = Vec::new();
        let mut notes = Vec::new();

        info!("Creating {} in {}", environment.primary_host(), environment.path);

        info!("{}", Step::SharedResources);
        let result = self.collaborators.runtime.ensure_shared().await;
        settle(Step::SharedResources, result, &mut warnings)?;

        info!("{}", Step::Files);
        settle(Step::Files, self.write_files(&environment.path), &mut warnings)?;

        info!("{}", Step::Document);
        let result = environment
            .compose
            .to_yaml()
            .and_then(|yaml| Ok(fs::write(environment.compose_file(), yaml)?));
        settle(Step::Document, result, &mut warnings)?;

        if let Some(proxy) = answers.proxy_url() {
            info!("{}", Step::MediaProxy);
            let result = patch_media_proxy(&environment.path, install_type, proxy);
            settle(Step::MediaProxy, result, &mut warnings)?;
        }

        info!("{}", Step::Database);
        let result = self.create_database(&environment.slug).await;
        settle(Step::Database, result, &mut warnings)?;

        info!("{}", Step::Containers);
        let result = self.collaborators.runtime.up(&environment.path).await;
        settle(Step::Containers, result, &mut warnings)?;

        if let Some(install) = &install {
            info!("{}", Step::WordPress);
            let result = self.install_wordpress(&environment, install).await;
            settle(Step::WordPress, result, &mut warnings)?;

            if install.install_type == InstallType::Subdomain {
                notes.push(format!(
                    "Subdomain sites of {} must be added to your hosts file manually",
                    environment.primary_host()
                ));
            }
        }

        if self.manage_hosts {
            info!("{}", Step::Hosts);
            let result = self.collaborators.hosts.add(environment.hosts.hosts()).await;
            settle(Step::Hosts, result, &mut warnings)?;
        } else {
            debug!("Hosts file management disabled, skipping");
        }

        info!("{}", Step::Descriptor);
        let result = EnvironmentDescriptor::new(environment.hosts.hosts().to_vec())
            .write(&environment.path);
        settle(Step::Descriptor, result, &mut warnings)?;

        info!(
            "Created {} with {} warning(s)",
            environment.primary_host(),
            warnings.len()
        );

        Ok(ProvisionReport {
            environment,
            warnings,
            notes,
        })
    }

    fn write_files(&self, path: &Utf8Path) -> Result<()> {
        fs::create_dir_all(path.join("wordpress"))?;
        templates::copy_scaffold(path)?;
        debug!("Prepared {} for {}", path, COMPOSE_FILE_NAME);
        Ok(())
    }

    async fn create_database(&self, name: &str) -> anyhow::Result<()> {
        self.collaborators.database.create(name).await?;
        self.collaborators.database.grant(name).await
    }

    async fn install_wordpress(
        &self,
        environment: &Environment,
        install: &WordPressInstall,
    ) -> anyhow::Result<()> {
        let cms = &self.collaborators.cms;
        let dir = environment.path.as_path();

        if install.install_type == InstallType::Dev {
            cms.download_develop(dir).await?;
        } else {
            cms.download(dir).await?;
        }
        cms.configure(dir, &environment.slug).await?;
        cms.install(dir, environment.primary_host(), install).await?;
        cms.set_rewrites(dir).await?;
        if install.empty_content {
            cms.empty_content(dir).await?;
        }
        Ok(())
    }
}

/// Apply the failure policy of `step` to its outcome
///
/// Fatal steps abort with [`Error::ProvisionFailed`]; the others are recorded
/// as warnings and the sequence goes on.
fn settle<E>(
    step: Step,
    result: std::result::Result<(), E>,
    warnings: &mut Vec<ProvisionWarning>,
) -> Result<()>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>> + fmt::Display,
{
    match result {
        Ok(()) => Ok(()),
        Err(e) if step.is_fatal() => Err(Error::provision_failed(step, e)),
        Err(e) => {
            let message = format!("{:#}", e);
            warn!("{} failed, continuing: {}", step, message);
            warnings.push(ProvisionWarning { step, message });
            Ok(())
        }
    }
}

/// Rewrite the environment's nginx config to fall back to a production origin
fn patch_media_proxy(env_dir: &Utf8Path, install_type: InstallType, proxy: &str) -> Result<()> {
    let config_path = env_dir
        .join("config")
        .join("nginx")
        .join(nginx_config_name(install_type));
    let config = fs::read_to_string(&config_path)?;
    fs::write(&config_path, apply_media_proxy(&config, proxy)?)?;
    debug!("Media proxy {} written to {}", proxy, config_path);
    Ok(())
}
