//! Core types shared by the builder, orchestrator and CLI

use camino::Utf8PathBuf;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::compose::ComposeDocument;
use crate::error::{Error, Result};
use crate::hostname::{env_slug, parse_hostname, parse_proxy_url, split_hosts};

/// PHP runtime versions with a published `45air/phpfpm` image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhpVersion {
    #[default]
    #[serde(rename = "7.3")]
    V73,
    #[serde(rename = "7.2")]
    V72,
    #[serde(rename = "7.1")]
    V71,
    #[serde(rename = "7.0")]
    V70,
    #[serde(rename = "5.6")]
    V56,
}

impl PhpVersion {
    /// All supported versions, newest first
    pub fn all() -> [Self; 5] {
        [Self::V73, Self::V72, Self::V71, Self::V70, Self::V56]
    }

    /// Image tag for this version
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V73 => "7.3",
            Self::V72 => "7.2",
            Self::V71 => "7.1",
            Self::V70 => "7.0",
            Self::V56 => "5.6",
        }
    }

    fn names() -> Vec<&'static str> {
        Self::all().iter().map(|v| v.as_str()).collect()
    }
}

impl std::fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PhpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| Error::invalid_answer("phpVersion", s, &Self::names()))
    }
}

/// How WordPress is laid out inside the environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    /// Single site
    #[default]
    Single,
    /// Subdirectory multisite
    Subdirectory,
    /// Subdomain multisite
    Subdomain,
    /// Core development checkout
    Dev,
}

impl InstallType {
    pub fn all() -> [Self; 4] {
        [Self::Single, Self::Subdirectory, Self::Subdomain, Self::Dev]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Subdirectory => "subdirectory",
            Self::Subdomain => "subdomain",
            Self::Dev => "dev",
        }
    }

    /// Label shown in the installation type prompt
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single Site",
            Self::Subdirectory => "Subdirectory Multisite",
            Self::Subdomain => "Subdomain Multisite",
            Self::Dev => "Core Development Version",
        }
    }

    pub fn is_multisite(&self) -> bool {
        matches!(self, Self::Subdirectory | Self::Subdomain)
    }

    fn names() -> Vec<&'static str> {
        Self::all().iter().map(|t| t.as_str()).collect()
    }
}

impl std::fmt::Display for InstallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InstallType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| Error::invalid_answer("wordpressType", s, &Self::names()))
    }
}

/// Answers collected by the creation questionnaire
///
/// Enumerated answers are kept as strings so that values arriving from an
/// answers file are validated by the compose builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Answers {
    pub hostname: String,
    pub add_more_hosts: bool,
    #[serde(deserialize_with = "host_list")]
    pub extra_hosts: Vec<String>,
    pub media_proxy: bool,
    pub proxy: Option<String>,
    pub php_version: String,
    pub elasticsearch: bool,
    pub wordpress: bool,
    pub wordpress_type: Option<String>,
    pub empty_content: bool,
    pub title: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// Extra hosts given either as one whitespace separated string or as a list
fn host_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HostList {
        Line(String),
        List(Vec<String>),
    }

    Ok(match HostList::deserialize(deserializer)? {
        HostList::Line(line) => split_hosts(&line),
        HostList::List(hosts) => hosts.iter().flat_map(|h| split_hosts(h)).collect(),
    })
}

impl Default for Answers {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            add_more_hosts: false,
            extra_hosts: Vec::new(),
            media_proxy: false,
            proxy: None,
            php_version: PhpVersion::default().as_str().to_string(),
            elasticsearch: false,
            wordpress: false,
            wordpress_type: None,
            empty_content: false,
            title: None,
            username: None,
            password: None,
            email: None,
        }
    }
}

impl Answers {
    /// Answers for a bare environment on `hostname`
    pub fn for_host(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Self::default()
        }
    }

    /// Apply the questionnaire's input filters
    ///
    /// Strips scheme, whitespace and path from every hostname and gives the
    /// proxy a scheme. Answers that already went through the filters come out
    /// unchanged.
    pub fn normalized(&self) -> Self {
        Self {
            hostname: parse_hostname(&self.hostname),
            extra_hosts: self.extra_hosts.iter().flat_map(|h| split_hosts(h)).collect(),
            proxy: self.proxy.as_deref().map(parse_proxy_url),
            ..self.clone()
        }
    }

    pub fn php(&self) -> Result<PhpVersion> {
        self.php_version.parse()
    }

    /// Installation type; "single" when WordPress was not requested
    pub fn install_type(&self) -> Result<InstallType> {
        match (&self.wordpress_type, self.wordpress) {
            (Some(value), true) => value.parse(),
            _ => Ok(InstallType::default()),
        }
    }

    /// Media proxy origin when one was requested
    pub fn proxy_url(&self) -> Option<&str> {
        if !self.media_proxy {
            return None;
        }
        self.proxy
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Primary plus extra hostnames
    pub fn host_set(&self) -> HostSet {
        let extras: &[String] = if self.add_more_hosts {
            &self.extra_hosts
        } else {
            &[]
        };
        HostSet::new(&self.hostname, extras)
    }

    /// WordPress install settings, defaults filled in, when WordPress was requested
    pub fn wordpress_install(&self) -> Result<Option<WordPressInstall>> {
        if !self.wordpress {
            return Ok(None);
        }

        let pick = |value: &Option<String>, default: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        Ok(Some(WordPressInstall {
            install_type: self.install_type()?,
            empty_content: self.empty_content,
            title: pick(&self.title, &self.hostname),
            username: pick(&self.username, "admin"),
            password: pick(&self.password, "password"),
            email: pick(&self.email, "admin@example.com"),
        }))
    }

    /// Check everything that must hold before any file is written
    pub fn validate(&self) -> Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(Error::empty_field("hostname"));
        }
        env_slug(&self.hostname)?;
        self.php()?;
        self.install_type()?;
        if self.media_proxy && self.proxy_url().is_none() {
            return Err(Error::empty_field("proxy"));
        }
        Ok(())
    }
}

/// Settings passed to the CMS installer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPressInstall {
    pub install_type: InstallType,
    pub empty_content: bool,
    pub title: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Ordered, deduplicated hostnames of one environment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostSet(Vec<String>);

impl HostSet {
    /// Primary host first, then extras in order, duplicates dropped
    pub fn new(primary: &str, extras: &[String]) -> Self {
        let mut hosts: Vec<String> = Vec::with_capacity(extras.len() + 1);
        for host in std::iter::once(primary).chain(extras.iter().map(String::as_str)) {
            let host = host.trim();
            if !host.is_empty() && !hosts.iter().any(|h| h == host) {
                hosts.push(host.to_string());
            }
        }
        Self(hosts)
    }

    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn hosts(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `*.<host>` for every host, in the same order
    pub fn wildcards(&self) -> Vec<String> {
        self.0.iter().map(|h| format!("*.{}", h)).collect()
    }

    /// Hosts followed by their wildcards, comma separated
    pub fn virtual_host(&self) -> String {
        let mut all = self.0.clone();
        all.extend(self.wildcards());
        all.join(",")
    }
}

/// One environment as produced by the orchestrator
#[derive(Debug, Clone)]
pub struct Environment {
    pub slug: String,
    pub path: Utf8PathBuf,
    pub hosts: HostSet,
    pub compose: ComposeDocument,
}

impl Environment {
    pub fn primary_host(&self) -> &str {
        self.hosts.primary().unwrap_or(&self.slug)
    }

    pub fn compose_file(&self) -> Utf8PathBuf {
        self.path.join(crate::compose::COMPOSE_FILE_NAME)
    }
}
