//! Common test helpers for airlocal-core integration tests
//!
//! Provides recording implementations of the collaborator traits so tests
//! can assert on the order of side effects and inject failures per call.

use airlocal_core::provision::{
    CmsInstaller, Collaborators, ContainerRuntime, DatabaseAdmin, HostsEditor,
};
use airlocal_core::types::WordPressInstall;
use airlocal_core::{Answers, EnvironmentRegistry};
use anyhow::{bail, Result};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Ordered record of collaborator calls, e.g. `"db.create docker-test"`.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

#[allow(dead_code)]
impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call whose name (the part before the first space) matches fail
    pub fn fail_on(&self, call: &str) {
        self.failing.lock().unwrap().insert(call.to_string());
    }

    fn record(&self, call: String) -> Result<()> {
        let name = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(call.clone());
        if self.failing.lock().unwrap().contains(&name) {
            bail!("{} failed", call);
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Call names without arguments, in order
    pub fn names(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn assert_called(&self, call: &str) {
        let calls = self.calls();
        assert!(
            calls.iter().any(|c| c == call),
            "'{}' was never called. Actual calls: {:?}",
            call,
            calls
        );
    }

    pub fn assert_not_called(&self, name: &str) {
        let names = self.names();
        assert!(
            !names.iter().any(|n| n == name),
            "'{}' was called but should not have been. Actual calls: {:?}",
            name,
            self.calls()
        );
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }
}

fn dir_name(dir: &Utf8Path) -> &str {
    dir.file_name().unwrap_or_default()
}

pub struct MockRuntime(pub CallLog);

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn is_available(&self) -> bool {
        true
    }

    async fn ensure_shared(&self) -> Result<()> {
        self.0.record("runtime.ensure_shared".into())
    }

    async fn up(&self, env_dir: &Utf8Path) -> Result<()> {
        self.0.record(format!("runtime.up {}", dir_name(env_dir)))
    }

    async fn down(&self, env_dir: &Utf8Path) -> Result<()> {
        self.0.record(format!("runtime.down {}", dir_name(env_dir)))
    }

    async fn restart(&self, env_dir: &Utf8Path) -> Result<()> {
        self.0.record(format!("runtime.restart {}", dir_name(env_dir)))
    }

    async fn clear_cache(&self) -> Result<()> {
        self.0.record("runtime.clear_cache".into())
    }
}

pub struct MockDatabase(pub CallLog);

#[async_trait]
impl DatabaseAdmin for MockDatabase {
    async fn create(&self, name: &str) -> Result<()> {
        self.0.record(format!("db.create {}", name))
    }

    async fn grant(&self, name: &str) -> Result<()> {
        self.0.record(format!("db.grant {}", name))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.0.record(format!("db.delete {}", name))
    }
}

pub struct MockCms(pub CallLog);

#[async_trait]
impl CmsInstaller for MockCms {
    async fn download(&self, env_dir: &Utf8Path) -> Result<()> {
        self.0.record(format!("cms.download {}", dir_name(env_dir)))
    }

    async fn download_develop(&self, env_dir: &Utf8Path) -> Result<()> {
        self.0.record(format!("cms.download_develop {}", dir_name(env_dir)))
    }

    async fn configure(&self, _env_dir: &Utf8Path, db_name: &str) -> Result<()> {
        self.0.record(format!("cms.configure {}", db_name))
    }

    async fn install(
        &self,
        _env_dir: &Utf8Path,
        host: &str,
        install: &WordPressInstall,
    ) -> Result<()> {
        self.0
            .record(format!("cms.install {} {}", host, install.install_type))
    }

    async fn set_rewrites(&self, env_dir: &Utf8Path) -> Result<()> {
        self.0.record(format!("cms.set_rewrites {}", dir_name(env_dir)))
    }

    async fn empty_content(&self, env_dir: &Utf8Path) -> Result<()> {
        self.0.record(format!("cms.empty_content {}", dir_name(env_dir)))
    }
}

pub struct MockHosts(pub CallLog);

#[async_trait]
impl HostsEditor for MockHosts {
    async fn add(&self, hosts: &[String]) -> Result<()> {
        self.0.record(format!("hosts.add {}", hosts.join(",")))
    }

    async fn remove(&self, hosts: &[String]) -> Result<()> {
        self.0.record(format!("hosts.remove {}", hosts.join(",")))
    }
}

/// Collaborators that all record into `log`
pub fn collaborators(log: &CallLog) -> Collaborators {
    Collaborators {
        runtime: Arc::new(MockRuntime(log.clone())),
        database: Arc::new(MockDatabase(log.clone())),
        cms: Arc::new(MockCms(log.clone())),
        hosts: Arc::new(MockHosts(log.clone())),
    }
}

/// Temporary sites root; keep the `TempDir` alive for the test's duration
#[allow(dead_code)]
pub fn sites_root() -> (TempDir, EnvironmentRegistry) {
    let tmp = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().join("sites")).unwrap();
    (tmp, EnvironmentRegistry::new(root))
}

/// Scenario A: bare environment on docker.test
#[allow(dead_code)]
pub fn scenario_a() -> Answers {
    Answers {
        php_version: "7.3".into(),
        ..Answers::for_host("docker.test")
    }
}

#[allow(dead_code)]
pub fn wordpress_answers(host: &str, install_type: &str) -> Answers {
    Answers {
        wordpress: true,
        wordpress_type: Some(install_type.into()),
        ..Answers::for_host(host)
    }
}
