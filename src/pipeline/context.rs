//! Invocation context and derived naming
//!
//! An [`InvocationContext`] is assembled once at startup from the service
//! configuration and command line, and is read-only for the rest of a run.
//! The [`ResolvedName`] derived from it is the single identifier shared by
//! the build project and the pipeline.

#![allow(clippy::must_use_candidate)]

use crate::pipeline::errors::{CI_SETTINGS_MISSING, ProvisionError, ROLE_MISSING};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default CodeBuild image.
pub const DEFAULT_BUILD_IMAGE: &str = "aws/codebuild/nodejs:7.0.0";

/// Default CodeBuild compute size.
pub const DEFAULT_COMPUTE_TYPE: &str = "BUILD_GENERAL1_SMALL";

/// Default command run by the build stage, before `--stage`/`--region`.
pub const DEFAULT_DEPLOY_COMMAND: &str =
    "npm install -g serverless && npm install && serverless deploy";

static STRICT_REPOSITORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").expect("valid regex"));

/// Value that must never show up in logs
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the wrapped value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(****)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

/// GitHub repository reference (`owner/name`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    raw: String,
    owner: String,
    name: String,
}

impl Repository {
    /// Splits `owner/name` on the first `/`.
    ///
    /// No validation happens here: without a separator the owner is the
    /// whole string and the name is empty.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (owner, name) = match raw.split_once('/') {
            Some((owner, name)) => (owner.to_string(), name.to_string()),
            None => (raw.clone(), String::new()),
        };
        Self { raw, owner, name }
    }

    /// Validates that the identifier is exactly `owner/name`.
    pub fn validate_strict(&self) -> Result<(), ProvisionError> {
        if STRICT_REPOSITORY.is_match(&self.raw) {
            Ok(())
        } else {
            Err(ProvisionError::InvalidRepository(self.raw.clone()))
        }
    }

    /// True when either the owner or the name is empty.
    pub fn is_incomplete(&self) -> bool {
        self.owner.is_empty() || self.name.is_empty()
    }

    /// Repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name; empty when the input had no separator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identifier as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Settings from the `awsCI` configuration block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiSettings {
    /// Execution role for the pipeline and service role for the build project
    #[serde(default)]
    pub role_arn: Option<String>,

    /// CodeBuild image
    #[serde(default = "default_image")]
    pub image: String,

    /// CodeBuild compute type
    #[serde(default = "default_compute_type")]
    pub compute_type: String,

    /// Command prefix written into the buildspec
    #[serde(default = "default_deploy_command")]
    pub deploy_command: String,
}

fn default_image() -> String {
    DEFAULT_BUILD_IMAGE.to_string()
}

fn default_compute_type() -> String {
    DEFAULT_COMPUTE_TYPE.to_string()
}

fn default_deploy_command() -> String {
    DEFAULT_DEPLOY_COMMAND.to_string()
}

impl CiSettings {
    /// Settings with the given role and default build parameters.
    pub fn with_role(role_arn: impl Into<String>) -> Self {
        Self {
            role_arn: Some(role_arn.into()),
            ..Self::default()
        }
    }
}

impl Default for CiSettings {
    fn default() -> Self {
        Self {
            role_arn: None,
            image: default_image(),
            compute_type: default_compute_type(),
            deploy_command: default_deploy_command(),
        }
    }
}

/// Everything a provisioning run needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Serverless service name
    pub service: String,
    /// Deployment stage
    pub stage: String,
    /// AWS region
    pub region: String,
    /// Source repository
    pub repository: Repository,
    /// Branch watched by the pipeline
    pub branch: String,
    /// GitHub access token
    pub token: Secret,
    /// `awsCI` block, absent when not configured
    pub ci: Option<CiSettings>,
    /// Explicit deployment bucket, skipping the stack lookup
    pub deployment_bucket: Option<String>,
}

impl InvocationContext {
    /// Returns the `awsCI` settings, failing when the block is absent.
    pub fn ci_settings(&self) -> Result<&CiSettings, ProvisionError> {
        self.ci
            .as_ref()
            .ok_or_else(|| ProvisionError::configuration(CI_SETTINGS_MISSING))
    }

    /// Returns the configured role, failing when absent or empty.
    pub fn role_arn(&self) -> Result<&str, ProvisionError> {
        self.ci
            .as_ref()
            .and_then(|ci| ci.role_arn.as_deref())
            .filter(|role| !role.trim().is_empty())
            .ok_or_else(|| ProvisionError::configuration(ROLE_MISSING))
    }

    /// Derives the name shared by the stack, build project and pipeline.
    pub fn resolved_name(&self) -> ResolvedName {
        ResolvedName(format!("{}-{}", self.service, self.stage))
    }
}

/// `{service}-{stage}`, used as stack, build project and pipeline name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolvedName(String);

impl ResolvedName {
    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// S3 bucket used as the pipeline artifact store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeploymentBucket(String);

impl DeploymentBucket {
    /// Wraps a bucket name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the bucket name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{context, context_without_role};
    use super::*;

    #[test]
    fn test_resolved_name() {
        assert_eq!(context().resolved_name().as_str(), "svc-dev");
    }

    #[test]
    fn test_repository_split() {
        let repo = Repository::parse("acme/widgets");
        assert_eq!(repo.owner(), "acme");
        assert_eq!(repo.name(), "widgets");
        assert!(repo.validate_strict().is_ok());
        assert!(!repo.is_incomplete());
    }

    #[test]
    fn test_repository_incomplete_parts() {
        for raw in ["widgets", "/widgets", "acme/", "/"] {
            assert!(Repository::parse(raw).is_incomplete(), "{raw}");
        }
        assert_eq!(Repository::parse("/widgets").owner(), "");
    }

    #[test]
    fn test_repository_without_separator() {
        let repo = Repository::parse("widgets");
        assert_eq!(repo.owner(), "widgets");
        assert_eq!(repo.name(), "");
        assert!(matches!(
            repo.validate_strict(),
            Err(ProvisionError::InvalidRepository(raw)) if raw == "widgets"
        ));
    }

    #[test]
    fn test_repository_extra_segments_rejected_in_strict_mode() {
        let repo = Repository::parse("acme/widgets/extra");
        assert_eq!(repo.name(), "widgets/extra");
        assert!(repo.validate_strict().is_err());
    }

    #[test]
    fn test_role_arn() {
        assert_eq!(context().role_arn().unwrap(), "arn:role");

        let err = context_without_role().role_arn().unwrap_err();
        assert_eq!(err.to_string(), ROLE_MISSING);
    }

    #[test]
    fn test_blank_role_is_missing() {
        let ctx = InvocationContext {
            ci: Some(CiSettings::with_role("  ")),
            ..context()
        };
        assert!(ctx.role_arn().unwrap_err().is_configuration());
    }

    #[test]
    fn test_missing_ci_block() {
        let ctx = InvocationContext {
            ci: None,
            ..context()
        };
        assert_eq!(ctx.ci_settings().unwrap_err().to_string(), CI_SETTINGS_MISSING);
        assert_eq!(ctx.role_arn().unwrap_err().to_string(), ROLE_MISSING);
    }

    #[test]
    fn test_secret_is_redacted() {
        let secret = Secret::new("ghp_abc");
        assert_eq!(format!("{secret:?}"), "Secret(****)");
        assert_eq!(secret.to_string(), "****");
        assert_eq!(secret.expose(), "ghp_abc");
        assert!(!format!("{:?}", context()).contains("tok\""));
    }

    #[test]
    fn test_ci_settings_defaults_from_yaml() {
        let ci: CiSettings = serde_yaml::from_str("roleArn: arn:aws:iam::1:role/ci").unwrap();
        assert_eq!(ci.role_arn.as_deref(), Some("arn:aws:iam::1:role/ci"));
        assert_eq!(ci.image, DEFAULT_BUILD_IMAGE);
        assert_eq!(ci.compute_type, DEFAULT_COMPUTE_TYPE);
        assert_eq!(ci.deploy_command, DEFAULT_DEPLOY_COMMAND);
    }
}
