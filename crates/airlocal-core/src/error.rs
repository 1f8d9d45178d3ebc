//! Error types for airlocal-core

use thiserror::Error;

use crate::provision::Step;

/// Result type alias using airlocal-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for airlocal
#[derive(Error, Debug)]
pub enum Error {
    /// Target environment directory exists and holds a managed environment
    #[error(
        "{hostname} environment already exists at {path}. To recreate the environment, \
         please delete it first by running `airlocal delete {hostname}`"
    )]
    EnvironmentExists { hostname: String, path: String },

    /// Target directory exists but has no readable descriptor
    #[error(
        "{path} already exists but is not a complete environment. Remove it with \
         `airlocal delete {hostname}` before creating {hostname} again"
    )]
    IncompleteEnvironment { hostname: String, path: String },

    /// Environment could not be located
    #[error("Cannot find {name} environment")]
    EnvironmentNotFound { name: String },

    /// An enumerated answer held an unsupported value
    #[error("Invalid value '{value}' for {field}. Allowed values: {allowed}")]
    InvalidAnswer {
        field: String,
        value: String,
        allowed: String,
    },

    /// A required answer was blank
    #[error("{field}: This field is required")]
    EmptyField { field: String },

    /// Hostname does not yield a usable slug
    #[error("Invalid hostname: {hostname}")]
    InvalidHostname { hostname: String },

    /// Generated compose document broke one of its invariants
    #[error("Invalid compose document: {message}")]
    InvalidDocument { message: String },

    /// Invalid configuration value or file
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A step of the creation sequence failed after the duplicate check
    #[error("{step} failed: {source}")]
    ProvisionFailed {
        step: Step,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Start, stop, restart or delete of an existing environment failed
    #[error("Failed to {action} {name}: {source}")]
    LifecycleFailed {
        action: &'static str,
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Embedded file missing from the binary
    #[error("Embedded file not found: {name}")]
    EmbeddedNotFound { name: String },

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an environment exists error
    pub fn environment_exists(hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self::EnvironmentExists {
            hostname: hostname.into(),
            path: path.into(),
        }
    }

    /// Create an incomplete environment error
    pub fn incomplete_environment(hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self::IncompleteEnvironment {
            hostname: hostname.into(),
            path: path.into(),
        }
    }

    /// Create an environment not found error
    pub fn environment_not_found(name: impl Into<String>) -> Self {
        Self::EnvironmentNotFound { name: name.into() }
    }

    /// Create an invalid answer error
    pub fn invalid_answer(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&str],
    ) -> Self {
        Self::InvalidAnswer {
            field: field.into(),
            value: value.into(),
            allowed: allowed.join(", "),
        }
    }

    /// Create an empty field error
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }

    /// Create an invalid hostname error
    pub fn invalid_hostname(hostname: impl Into<String>) -> Self {
        Self::InvalidHostname {
            hostname: hostname.into(),
        }
    }

    /// Create an invalid document error
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Wrap a failure of one creation step
    pub fn provision_failed(
        step: Step,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ProvisionFailed {
            step,
            source: source.into(),
        }
    }

    /// Wrap a failure of a lifecycle action on an existing environment
    pub fn lifecycle_failed(
        action: &'static str,
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::LifecycleFailed {
            action,
            name: name.into(),
            source: source.into(),
        }
    }

    /// True for errors raised before the orchestrator touched the filesystem
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::EnvironmentExists { .. }
                | Self::IncompleteEnvironment { .. }
                | Self::InvalidAnswer { .. }
                | Self::EmptyField { .. }
                | Self::InvalidHostname { .. }
                | Self::InvalidDocument { .. }
        )
    }
}
