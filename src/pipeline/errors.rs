//! Error types for the provisioning domain

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Message used when the `awsCI` block or its role is absent.
pub const ROLE_MISSING: &str =
    "awsCI settings in Serverless are not configured correctly: roleArn missing";

/// Message used when the `awsCI` block is absent altogether.
pub const CI_SETTINGS_MISSING: &str = "awsCI settings in Serverless are not configured correctly";

/// Message used when the deployment bucket lookup fails.
pub const BUCKET_NOT_FOUND: &str = "Cannot find AWS::S3::DeploymentBucket";

/// Failure reported by a remote capability (stack lookup, build, pipeline).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    /// Service error code, when the remote supplied one.
    pub code: Option<String>,
    /// Human readable diagnostic from the remote.
    pub message: String,
}

impl RemoteError {
    /// Creates an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Attaches a service error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Errors raised by a single provisioning step
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Required settings are missing; the message is surfaced verbatim
    #[error("{0}")]
    Configuration(String),

    /// The repository identifier is not `owner/name` (strict mode only)
    #[error("Invalid repository '{0}': expected owner/name")]
    InvalidRepository(String),

    /// A remote provisioning call failed
    #[error("{operation} failed: {source}")]
    RemoteRejection {
        /// Remote operation that was rejected.
        operation: &'static str,
        /// The remote's own diagnostic.
        #[source]
        source: RemoteError,
    },

    /// Writing a local artifact failed
    #[error("IO error writing {}: {source}", .path.display())]
    Io {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },
}

impl ProvisionError {
    /// Builds a configuration error from any message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Builds a remote rejection for `operation`.
    #[must_use]
    pub fn remote(operation: &'static str, source: RemoteError) -> Self {
        Self::RemoteRejection { operation, source }
    }

    /// Returns true for configuration errors
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Step of a provisioning run that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    /// Build project provisioning
    BuildProject,
    /// Pipeline provisioning
    Pipeline,
    /// Buildspec emission
    BuildSpec,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildProject => write!(f, "build-project"),
            Self::Pipeline => write!(f, "pipeline"),
            Self::BuildSpec => write!(f, "buildspec"),
        }
    }
}

/// A failure tagged with the step that raised it
#[derive(Debug)]
pub struct StepFailure {
    /// Step that failed.
    pub step: ProvisionStep,
    /// Error raised by the step.
    pub error: ProvisionError,
}

/// Aggregate error returned by the orchestrator when any step fails
#[derive(Error, Debug)]
#[error("The pipeline was not created: {}", summarize(.failures))]
pub struct PipelineCreationError {
    /// Every failure, in step order.
    pub failures: Vec<StepFailure>,
}

impl PipelineCreationError {
    /// Returns the first failure, if any.
    #[must_use]
    pub fn first(&self) -> Option<&ProvisionError> {
        self.failures.first().map(|f| &f.error)
    }

    /// Returns the error raised by `step`, if it failed.
    #[must_use]
    pub fn failure_of(&self, step: ProvisionStep) -> Option<&ProvisionError> {
        self.failures
            .iter()
            .find(|f| f.step == step)
            .map(|f| &f.error)
    }
}

fn summarize(failures: &[StepFailure]) -> String {
    failures
        .iter()
        .map(|f| f.error.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_is_verbatim() {
        let err = ProvisionError::configuration(ROLE_MISSING);
        assert_eq!(err.to_string(), ROLE_MISSING);
        assert!(err.is_configuration());
    }

    #[test]
    fn test_remote_rejection_keeps_diagnostic() {
        let err = ProvisionError::remote(
            "CreatePipeline",
            RemoteError::new("User is not authorized").with_code("AccessDenied"),
        );
        assert_eq!(err.to_string(), "CreatePipeline failed: User is not authorized");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_pipeline_creation_error_summary() {
        let err = PipelineCreationError {
            failures: vec![
                StepFailure {
                    step: ProvisionStep::BuildProject,
                    error: ProvisionError::configuration(ROLE_MISSING),
                },
                StepFailure {
                    step: ProvisionStep::Pipeline,
                    error: ProvisionError::configuration(BUCKET_NOT_FOUND),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            format!("The pipeline was not created: {ROLE_MISSING}; {BUCKET_NOT_FOUND}")
        );
        assert!(err.failure_of(ProvisionStep::BuildSpec).is_none());
        assert!(err.first().is_some_and(ProvisionError::is_configuration));
    }

    #[test]
    fn test_step_display() {
        assert_eq!(ProvisionStep::BuildProject.to_string(), "build-project");
        assert_eq!(ProvisionStep::Pipeline.to_string(), "pipeline");
        assert_eq!(ProvisionStep::BuildSpec.to_string(), "buildspec");
    }
}
