//! Persisted key/value settings with built-in defaults
//!
//! The store is loaded once at process start and handed to every consumer.
//! Reads fall back to the default table; every `set` rewrites the whole file
//! atomically.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::{expand_home, get_config_dir, get_home_dir};

/// File name of the settings file inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Root directory holding one directory per environment
pub const KEY_SITES_PATH: &str = "sitesPath";

/// Root directory for snapshot storage
pub const KEY_SNAPSHOTS_PATH: &str = "snapshotsPath";

/// Whether creation and deletion edit the system hosts file
pub const KEY_MANAGE_HOSTS: &str = "manageHosts";

/// Typed view over the settings the provisioning core consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub sites_path: Utf8PathBuf,
    pub snapshots_path: Utf8PathBuf,
    pub manage_hosts: bool,
}

/// Key/value configuration persisted as JSON
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Utf8PathBuf,
    values: Map<String, Value>,
    defaults: Map<String, Value>,
}

impl ConfigStore {
    /// Load the store from `~/.airlocal/config.json` (or `$AIRLOCAL_CONFIG_DIR`)
    pub fn load_default() -> Result<Self> {
        let path = get_config_dir()?.join(CONFIG_FILE_NAME);
        let defaults = Self::default_table(&get_home_dir()?);
        Self::load_with_defaults(path, defaults)
    }

    /// Load the store from an explicit file path
    pub fn load(path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let defaults = Self::default_table(&get_home_dir()?);
        Self::load_with_defaults(path.into(), defaults)
    }

    /// Load the store with a caller-supplied default table
    pub fn load_with_defaults(path: Utf8PathBuf, defaults: Map<String, Value>) -> Result<Self> {
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&content)? {
                Value::Object(map) => map,
                _ => {
                    return Err(Error::invalid_config(format!(
                        "{} must contain a JSON object",
                        path
                    )))
                }
            }
        } else {
            Map::new()
        };

        debug!("Loaded {} configuration keys from {}", values.len(), path);
        Ok(Self {
            path,
            values,
            defaults,
        })
    }

    /// Built-in defaults relative to a home directory
    pub fn default_table(home: &Utf8Path) -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert(
            KEY_SITES_PATH.to_string(),
            Value::String(home.join("air-local-docker-sites").to_string()),
        );
        defaults.insert(
            KEY_SNAPSHOTS_PATH.to_string(),
            Value::String(home.join(".airsnapshots").to_string()),
        );
        defaults.insert(KEY_MANAGE_HOSTS.to_string(), Value::Bool(true));
        defaults
    }

    /// Path of the backing file
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether a settings file has been written before
    pub fn is_configured(&self) -> bool {
        self.path.exists()
    }

    /// Value for a key, falling back to the default table
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).or_else(|| self.defaults.get(key))
    }

    /// String value for a key
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Boolean value for a key; accepts the strings "true"/"false"
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Store a value and persist the file
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        self.values.insert(key.into(), value);
        self.write()
    }

    /// Remove an explicit value (the default applies again) and persist
    pub fn unset(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        self.write()
    }

    /// Persist every default that has no explicit value
    pub fn configure_defaults(&mut self) -> Result<()> {
        for (key, value) in &self.defaults {
            self.values
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self.write()
    }

    /// All effective values, defaults included
    pub fn entries(&self) -> Map<String, Value> {
        let mut merged = self.defaults.clone();
        for (key, value) in &self.values {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Resolve the typed settings used by the provisioning core
    pub fn settings(&self) -> Result<Settings> {
        let sites_path = self
            .get_string(KEY_SITES_PATH)
            .ok_or_else(|| Error::invalid_config(format!("{} is not set", KEY_SITES_PATH)))?;
        let snapshots_path = self
            .get_string(KEY_SNAPSHOTS_PATH)
            .ok_or_else(|| Error::invalid_config(format!("{} is not set", KEY_SNAPSHOTS_PATH)))?;

        Ok(Settings {
            sites_path: expand_home(&sites_path)?,
            snapshots_path: expand_home(&snapshots_path)?,
            manage_hosts: self.get_bool(KEY_MANAGE_HOSTS).unwrap_or(true),
        })
    }

    /// Write the explicit values to disk via a temp file and rename
    fn write(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::invalid_config(format!("{} has no parent directory", self.path)))?;
        fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(&Value::Object(self.values.clone()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!("Wrote configuration to {}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let defaults = ConfigStore::default_table(Utf8Path::new("/home/tester"));
        ConfigStore::load_with_defaults(path, defaults).unwrap()
    }

    #[test]
    fn test_defaults_apply_without_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.is_configured());
        assert_eq!(
            store.get_string(KEY_SITES_PATH).unwrap(),
            "/home/tester/air-local-docker-sites"
        );
        assert_eq!(store.get_bool(KEY_MANAGE_HOSTS), Some(true));
        assert!(store.get("unknownKey").is_none());
    }

    #[test]
    fn test_set_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set(KEY_MANAGE_HOSTS, json!(false)).unwrap();
        store.set("custom", json!("value")).unwrap();

        let reloaded = store_in(&dir);
        assert!(reloaded.is_configured());
        assert_eq!(reloaded.get_bool(KEY_MANAGE_HOSTS), Some(false));
        assert_eq!(reloaded.get_string("custom").unwrap(), "value");
    }

    #[test]
    fn test_unset_restores_default() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set(KEY_SITES_PATH, json!("/srv/sites")).unwrap();
        store.unset(KEY_SITES_PATH).unwrap();

        assert_eq!(
            store.get_string(KEY_SITES_PATH).unwrap(),
            "/home/tester/air-local-docker-sites"
        );
    }

    #[test]
    fn test_configure_defaults_keeps_explicit_values() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set(KEY_SITES_PATH, json!("/srv/sites")).unwrap();
        store.configure_defaults().unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        let saved: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(saved[KEY_SITES_PATH], "/srv/sites");
        assert_eq!(saved[KEY_MANAGE_HOSTS], true);
        assert_eq!(saved[KEY_SNAPSHOTS_PATH], "/home/tester/.airsnapshots");
    }

    #[test]
    fn test_settings_parses_string_bool() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set(KEY_MANAGE_HOSTS, json!("false")).unwrap();
        store.set(KEY_SITES_PATH, json!("/srv/sites")).unwrap();

        let settings = store.settings().unwrap();
        assert!(!settings.manage_hosts);
        assert_eq!(settings.sites_path, Utf8PathBuf::from("/srv/sites"));
    }

    #[test]
    fn test_rejects_non_object_file() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        fs::write(&path, "[1, 2]").unwrap();

        let result = ConfigStore::load_with_defaults(path, Map::new());
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
