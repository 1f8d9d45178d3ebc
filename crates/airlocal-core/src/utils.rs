//! Shared utility functions for airlocal crates

use camino::Utf8PathBuf;

use crate::error::{Error, Result};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "AIRLOCAL_CONFIG_DIR";

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so test
/// harnesses and containers that remap HOME are respected.
pub fn get_home_dir() -> Result<Utf8PathBuf> {
    let home = match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => std::path::PathBuf::from(home),
        _ => dirs::home_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?,
    };

    Utf8PathBuf::from_path_buf(home)
        .map_err(|_| Error::invalid_config("Home directory path is not valid UTF-8"))
}

/// Get the airlocal configuration directory (~/.airlocal)
pub fn get_config_dir() -> Result<Utf8PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(Utf8PathBuf::from(dir));
        }
    }

    Ok(get_home_dir()?.join(".airlocal"))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(input: &str) -> Result<Utf8PathBuf> {
    match input.strip_prefix('~') {
        Some(rest) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            let home = get_home_dir()?;
            Ok(if rest.is_empty() { home } else { home.join(rest) })
        }
        None => Ok(Utf8PathBuf::from(input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_home_dir_from_env() {
        if std::env::var("HOME").is_ok() {
            let home = get_home_dir().unwrap();
            assert!(!home.as_str().is_empty());
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_override() {
        std::env::set_var(CONFIG_DIR_ENV, "/tmp/airlocal-test-config");
        assert_eq!(
            get_config_dir().unwrap(),
            Utf8PathBuf::from("/tmp/airlocal-test-config")
        );
        std::env::remove_var(CONFIG_DIR_ENV);
    }

    #[test]
    #[serial]
    fn test_expand_home() {
        let home = get_home_dir().unwrap();
        assert_eq!(expand_home("~/sites").unwrap(), home.join("sites"));
        assert_eq!(expand_home("~").unwrap(), home);
        assert_eq!(
            expand_home("/srv/sites").unwrap(),
            Utf8PathBuf::from("/srv/sites")
        );
    }
}
