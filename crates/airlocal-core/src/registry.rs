//! Environment registry over the sites root directory
//!
//! Every immediate subdirectory holding a valid descriptor is a managed
//! environment. Directories without one are either unrelated or the remains
//! of an interrupted creation.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

use crate::descriptor::EnvironmentDescriptor;
use crate::error::Result;
use crate::hostname::is_slug;

/// What lives at an environment's path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentState {
    /// Nothing at the path
    Missing,
    /// Path exists without a valid descriptor
    Incomplete,
    /// Path exists with a valid descriptor
    Managed,
}

/// Registry of environments under one sites root
#[derive(Debug, Clone)]
pub struct EnvironmentRegistry {
    sites_root: Utf8PathBuf,
}

impl EnvironmentRegistry {
    pub fn new(sites_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            sites_root: sites_root.into(),
        }
    }

    pub fn sites_root(&self) -> &Utf8Path {
        &self.sites_root
    }

    /// Directory of an environment
    pub fn path_for(&self, slug: &str) -> Utf8PathBuf {
        self.sites_root.join(slug)
    }

    /// True if anything exists at the environment's path
    pub fn exists(&self, slug: &str) -> bool {
        self.state(slug) != EnvironmentState::Missing
    }

    /// State of an environment's path
    ///
    /// Anything that is not a slug, the empty string included, never names an
    /// environment and reads as [`EnvironmentState::Missing`].
    pub fn state(&self, slug: &str) -> EnvironmentState {
        if !is_slug(slug) {
            return EnvironmentState::Missing;
        }
        let path = self.path_for(slug);
        if !path.exists() {
            EnvironmentState::Missing
        } else if path.is_dir() && EnvironmentDescriptor::load_if_valid(&path).is_some() {
            EnvironmentState::Managed
        } else {
            EnvironmentState::Incomplete
        }
    }

    /// Slugs of all managed environments, sorted
    pub fn list_environments(&self) -> Result<Vec<String>> {
        let mut slugs: Vec<String> = self
            .subdirectories()?
            .into_iter()
            .filter(|(slug, path)| {
                is_slug(slug) && EnvironmentDescriptor::load_if_valid(path).is_some()
            })
            .map(|(slug, _)| slug)
            .collect();
        slugs.sort();
        Ok(slugs)
    }

    /// Slugs of directories that lack a valid descriptor, sorted
    pub fn incomplete(&self) -> Result<Vec<String>> {
        let mut slugs: Vec<String> = self
            .subdirectories()?
            .into_iter()
            .filter(|(slug, path)| {
                is_slug(slug) && EnvironmentDescriptor::load_if_valid(path).is_none()
            })
            .map(|(slug, _)| slug)
            .collect();
        slugs.sort();
        Ok(slugs)
    }

    /// Hostnames recorded for an environment; empty if unreadable
    pub fn hosts_for(&self, slug: &str) -> Vec<String> {
        EnvironmentDescriptor::load_if_valid(&self.path_for(slug))
            .map(|d| d.env_hosts)
            .unwrap_or_default()
    }

    /// Managed environment containing `dir`, if any
    ///
    /// Paths are compared case-insensitively to tolerate case-folding
    /// filesystems.
    pub fn env_from_dir(&self, dir: &Utf8Path) -> Option<String> {
        let root = self.sites_root.as_str().trim_end_matches('/').to_lowercase();
        let dir = dir.as_str().to_lowercase();

        let rest = dir.strip_prefix(&root)?;
        if !rest.starts_with('/') {
            return None;
        }
        let slug = rest.trim_start_matches('/').split('/').next()?;
        if slug.is_empty() {
            return None;
        }

        (self.state(slug) == EnvironmentState::Managed).then(|| slug.to_string())
    }

    fn subdirectories(&self) -> Result<Vec<(String, Utf8PathBuf)>> {
        if !self.sites_root.exists() {
            debug!("Sites root {} does not exist yet", self.sites_root);
            return Ok(Vec::new());
        }

        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.sites_root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let path = self.sites_root.join(&name);
            dirs.push((name, path));
        }
        Ok(dirs)
    }
}
