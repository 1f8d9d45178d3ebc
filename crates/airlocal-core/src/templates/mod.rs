//! Files embedded into the binary
//!
//! - `scaffold/`: per-environment config files copied into each new
//!   environment directory
//! - `global/`: compose file for the services shared by all environments
//! - the media proxy snippet rendered with Tera

mod proxy;

pub use proxy::{apply_media_proxy, PROXY_URL_MARKER, TRY_PROXY_MARKER};

use camino::Utf8Path;
use rust_embed::RustEmbed;
use std::fs;
use tracing::debug;

use crate::error::{Error, Result};

/// Per-environment scaffold files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/scaffold/"]
struct ScaffoldFiles;

/// Shared gateway files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/global/"]
struct GlobalFiles;

/// Directories that must exist even though nothing is embedded in them
const EMPTY_SCAFFOLD_DIRS: &[&str] = &["config/elasticsearch/plugins"];

/// Relative paths of all scaffold files
pub fn scaffold_files() -> Vec<String> {
    let mut files: Vec<String> = ScaffoldFiles::iter().map(|f| f.to_string()).collect();
    files.sort();
    files
}

/// Copy the scaffold tree into an environment directory
///
/// Returns the number of files written.
pub fn copy_scaffold(dest: &Utf8Path) -> Result<usize> {
    let mut written = 0;
    for file in ScaffoldFiles::iter() {
        let embedded = ScaffoldFiles::get(&file)
            .ok_or_else(|| Error::EmbeddedNotFound {
                name: file.to_string(),
            })?;
        let target = dest.join(file.as_ref());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, embedded.data.as_ref())?;
        written += 1;
    }

    for dir in EMPTY_SCAFFOLD_DIRS {
        fs::create_dir_all(dest.join(dir))?;
    }

    debug!("Copied {} scaffold files into {}", written, dest);
    Ok(written)
}

/// Contents of an embedded global file
pub fn global_file(name: &str) -> Result<String> {
    let embedded = GlobalFiles::get(name).ok_or_else(|| Error::EmbeddedNotFound {
        name: name.to_string(),
    })?;
    String::from_utf8(embedded.data.into_owned())
        .map_err(|_| Error::invalid_config(format!("Embedded file {} is not UTF-8", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_scaffold_contains_both_nginx_configs() {
        let files = scaffold_files();
        assert!(files.contains(&"config/nginx/default.conf".to_string()));
        assert!(files.contains(&"config/nginx/develop.conf".to_string()));
        assert!(files.contains(&"config/php-fpm/wp-cli.local.yml".to_string()));
    }

    #[test]
    fn test_copy_scaffold_writes_tree() {
        let dir = TempDir::new().unwrap();
        let dest = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let written = copy_scaffold(&dest).unwrap();

        assert_eq!(written, scaffold_files().len());
        assert!(dest.join("config/php-fpm/php.ini").is_file());
        assert!(dest.join("config/elasticsearch/plugins").is_dir());
    }

    #[test]
    fn test_global_compose_embedded() {
        let content = global_file("docker-compose.yml").unwrap();
        assert!(content.contains("mysql"));
        assert!(global_file("missing.yml").is_err());
    }
}
