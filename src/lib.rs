//! # awsci - CI pipelines for Serverless services on AWS
//!
//! Given a GitHub repository, branch and access token, awsci provisions a
//! continuous-integration pipeline for a Serverless service:
//!
//! - a CodeBuild project named `{service}-{stage}`, created only when absent
//! - a two-stage CodePipeline pipeline (`Source` from GitHub, `Deploy`
//!   through the CodeBuild project) storing artifacts in the service's
//!   deployment bucket
//! - a `buildspec.yml` that installs the Serverless CLI and deploys the stage
//!
//! The three steps run concurrently; a run reports one outcome and never
//! rolls back resources that were already created.
//!
//! ## Layout
//!
//! - [`pipeline`]: domain types and errors
//! - [`remote`]: remote capability traits and an in-memory substitute
//! - [`provision`]: the provisioning steps and the [`Orchestrator`]
//! - [`infrastructure`]: configuration, logging and the AWS SDK adapter

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod infrastructure;
pub mod pipeline;
pub mod provision;
pub mod remote;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use infrastructure::{AwsRemote, Config, ConfigError, Overrides, init_logging};
pub use pipeline::{
    BuildProjectDefinition, BuildProjectHandle, BuildSpecDocument, CiSettings, InvocationContext,
    Outcome, PipelineCreationError, PipelineDefinition, PipelineHandle, ProvisionError,
    RemoteError, Repository, ResolvedName,
};
pub use provision::{Orchestrator, ProvisionOptions};
pub use remote::{BuildProjects, Pipelines, RemoteClients, StackResources};

/// Version of the awsci crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
