//! WordPress installation through WP-CLI inside the phpfpm container

use airlocal_core::compose::COMPOSE_FILE_NAME;
use airlocal_core::provision::CmsInstaller;
use airlocal_core::types::{InstallType, WordPressInstall};
use async_trait::async_trait;
use camino::Utf8Path;
use tracing::info;

use crate::database::{DB_PASSWORD, DB_USER, MYSQL_SERVICE};
use crate::docker::Docker;
use crate::error::Result;

const PHPFPM_SERVICE: &str = "phpfpm";
const WEB_USER: &str = "www-data";
const DEVELOP_REPOSITORY: &str = "https://github.com/WordPress/wordpress-develop.git";

/// Widgets WordPress places in the sidebar of a fresh install
const DEFAULT_WIDGETS: &[&str] = &[
    "search-2",
    "recent-posts-2",
    "recent-comments-2",
    "archives-2",
    "categories-2",
    "meta-2",
];

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

pub fn download_args() -> Vec<String> {
    owned(&["wp", "core", "download", "--force"])
}

/// Commands checking out and building the core development repository
pub fn download_develop_commands() -> Vec<Vec<String>> {
    vec![
        owned(&["git", "clone", DEVELOP_REPOSITORY, "."]),
        owned(&["npm", "install"]),
        owned(&["npm", "run", "build:dev"]),
    ]
}

pub fn config_args(db_name: &str) -> Vec<String> {
    vec![
        "wp".into(),
        "config".into(),
        "create".into(),
        "--force".into(),
        format!("--dbname={}", db_name),
        format!("--dbuser={}", DB_USER),
        format!("--dbpass={}", DB_PASSWORD),
        format!("--dbhost={}", MYSQL_SERVICE),
    ]
}

/// `wp core install` or `wp core multisite-install` for an install
pub fn install_args(host: &str, install: &WordPressInstall) -> Vec<String> {
    let command = if install.install_type.is_multisite() {
        "multisite-install"
    } else {
        "install"
    };

    let mut args = vec![
        "wp".to_string(),
        "core".to_string(),
        command.to_string(),
        format!("--url=http://{}", host),
        format!("--title={}", install.title),
        format!("--admin_user={}", install.username),
        format!("--admin_password={}", install.password),
        format!("--admin_email={}", install.email),
        "--skip-email".to_string(),
    ];
    if install.install_type == InstallType::Subdomain {
        args.push("--subdomains".to_string());
    }
    args
}

pub fn rewrite_args() -> Vec<String> {
    owned(&["wp", "rewrite", "structure", "/%postname%/"])
}

pub fn empty_content_commands() -> Vec<Vec<String>> {
    let mut widgets = owned(&["wp", "widget", "delete"]);
    widgets.extend(owned(DEFAULT_WIDGETS));

    vec![
        owned(&["wp", "site", "empty", "--yes"]),
        owned(&["wp", "plugin", "delete", "hello", "akismet"]),
        widgets,
    ]
}

/// [`CmsInstaller`] running WP-CLI through `docker compose exec`
pub struct WpCliInstaller {
    docker: Docker,
}

impl Default for WpCliInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl WpCliInstaller {
    pub fn new() -> Self {
        Self::with_docker(Docker::new())
    }

    pub fn with_docker(docker: Docker) -> Self {
        Self { docker }
    }

    async fn exec(&self, env_dir: &Utf8Path, command: &[String]) -> Result<()> {
        let command: Vec<&str> = command.iter().map(String::as_str).collect();
        self.docker
            .compose_exec(
                &env_dir.join(COMPOSE_FILE_NAME),
                PHPFPM_SERVICE,
                Some(WEB_USER),
                &command,
            )
            .await?;
        Ok(())
    }

    async fn exec_all(&self, env_dir: &Utf8Path, commands: &[Vec<String>]) -> Result<()> {
        for command in commands {
            self.exec(env_dir, command).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CmsInstaller for WpCliInstaller {
    async fn download(&self, env_dir: &Utf8Path) -> anyhow::Result<()> {
        info!("Downloading WordPress");
        self.exec(env_dir, &download_args()).await?;
        Ok(())
    }

    async fn download_develop(&self, env_dir: &Utf8Path) -> anyhow::Result<()> {
        info!("Cloning the WordPress development repository");
        self.exec_all(env_dir, &download_develop_commands()).await?;
        Ok(())
    }

    async fn configure(&self, env_dir: &Utf8Path, db_name: &str) -> anyhow::Result<()> {
        self.exec(env_dir, &config_args(db_name)).await?;
        Ok(())
    }

    async fn install(
        &self,
        env_dir: &Utf8Path,
        host: &str,
        install: &WordPressInstall,
    ) -> anyhow::Result<()> {
        info!("Installing WordPress ({}) for {}", install.install_type, host);
        self.exec(env_dir, &install_args(host, install)).await?;
        Ok(())
    }

    async fn set_rewrites(&self, env_dir: &Utf8Path) -> anyhow::Result<()> {
        self.exec(env_dir, &rewrite_args()).await?;
        Ok(())
    }

    async fn empty_content(&self, env_dir: &Utf8Path) -> anyhow::Result<()> {
        info!("Removing default content");
        self.exec_all(env_dir, &empty_content_commands()).await?;
        Ok(())
    }
}
