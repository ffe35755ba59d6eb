//! Configuration management
//!
//! Reads the parts of a Serverless service file the provisioner needs and
//! merges them with command-line overrides into an [`InvocationContext`].

use crate::pipeline::{CiSettings, InvocationContext, Repository, Secret};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stage used when neither the command line nor the provider sets one.
pub const DEFAULT_STAGE: &str = "dev";

/// Region used when neither the command line nor the provider sets one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Errors loading the service configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the service file.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for a service
    #[error("Failed to parse service configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A bare name or a `{ name: ... }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameRef {
    /// `service: my-service`
    Plain(String),
    /// `service: { name: my-service }`
    Block {
        /// The name
        name: String,
    },
}

impl NameRef {
    /// Returns the name either form carries.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) | Self::Block { name } => name,
        }
    }
}

/// `provider` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Default stage
    #[serde(default)]
    pub stage: Option<String>,
    /// Default region
    #[serde(default)]
    pub region: Option<String>,
    /// Explicit deployment bucket
    #[serde(default)]
    pub deployment_bucket: Option<NameRef>,
}

/// `custom` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomConfig {
    /// `awsCI` block
    #[serde(rename = "awsCI", default)]
    pub aws_ci: Option<CiSettings>,
}

/// Service configuration (`serverless.yml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service: NameRef,
    /// Provider section
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Custom section
    #[serde(default)]
    pub custom: CustomConfig,
}

impl Config {
    /// Loads the service file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parses a service file from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid YAML or a missing service.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `owner/repo`
    pub repo: String,
    /// Branch to watch
    pub branch: String,
    /// GitHub access token
    pub token: String,
    /// Stage override
    pub stage: Option<String>,
    /// Region override
    pub region: Option<String>,
}

impl InvocationContext {
    /// Merges the service file and command-line values.
    ///
    /// Command-line stage and region win over the provider section, which
    /// wins over the built-in defaults.
    #[must_use]
    pub fn from_config(config: &Config, overrides: Overrides) -> Self {
        let stage = overrides
            .stage
            .or_else(|| config.provider.stage.clone())
            .unwrap_or_else(|| DEFAULT_STAGE.to_string());
        let region = overrides
            .region
            .or_else(|| config.provider.region.clone())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Self {
            service: config.service.name().to_string(),
            stage,
            region,
            repository: Repository::parse(overrides.repo),
            branch: overrides.branch,
            token: Secret::new(overrides.token),
            ci: config.custom.aws_ci.clone(),
            deployment_bucket: config
                .provider
                .deployment_bucket
                .as_ref()
                .map(NameRef::name)
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string),
        }
    }
}
