//! Databases on the shared MySQL service of the global compose project

use airlocal_core::provision::DatabaseAdmin;
use async_trait::async_trait;
use camino::Utf8PathBuf;
use tracing::info;

use crate::docker::Docker;
use crate::error::Result;

/// Service name of MySQL in the global compose file
pub const MYSQL_SERVICE: &str = "mysql";

const ROOT_PASSWORD: &str = "password";

/// Application user every environment connects as
pub const DB_USER: &str = "wordpress";
pub const DB_PASSWORD: &str = "password";

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub fn create_database_sql(name: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {};", quote_identifier(name))
}

pub fn grant_privileges_sql(name: &str) -> String {
    format!(
        "GRANT ALL PRIVILEGES ON {}.* TO '{}'@'%' IDENTIFIED BY '{}';",
        quote_identifier(name),
        DB_USER,
        DB_PASSWORD
    )
}

pub fn drop_database_sql(name: &str) -> String {
    format!("DROP DATABASE IF EXISTS {};", quote_identifier(name))
}

/// [`DatabaseAdmin`] running the mysql client inside the global mysql container
pub struct MySqlAdmin {
    docker: Docker,
    global_compose: Utf8PathBuf,
}

impl MySqlAdmin {
    pub fn new(global_compose: impl Into<Utf8PathBuf>) -> Self {
        Self::with_docker(Docker::new(), global_compose)
    }

    pub fn with_docker(docker: Docker, global_compose: impl Into<Utf8PathBuf>) -> Self {
        Self {
            docker,
            global_compose: global_compose.into(),
        }
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        let password = format!("-p{}", ROOT_PASSWORD);
        self.docker
            .compose_exec(
                &self.global_compose,
                MYSQL_SERVICE,
                None,
                &["mysql", "-uroot", &password, "-e", sql],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DatabaseAdmin for MySqlAdmin {
    async fn create(&self, name: &str) -> anyhow::Result<()> {
        info!("Creating database {}", name);
        self.execute(&create_database_sql(name)).await?;
        Ok(())
    }

    async fn grant(&self, name: &str) -> anyhow::Result<()> {
        self.execute(&grant_privileges_sql(name)).await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        info!("Dropping database {}", name);
        self.execute(&drop_database_sql(name)).await?;
        Ok(())
    }
}
