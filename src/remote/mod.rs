//! Remote capability contracts
//!
//! The provisioners only talk to the cloud through these traits. Each run
//! receives its handles through [`RemoteClients`] instead of process-wide
//! client state, so tests and dry runs can substitute
//! [`memory::InMemoryRemote`].

pub mod memory;

use crate::pipeline::{BuildProjectDefinition, PipelineDefinition, RemoteError};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Remote operation names, as the services spell them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    /// `DescribeStackResource`
    DescribeStackResource,
    /// `ListProjects`
    ListProjects,
    /// `CreateProject`
    CreateProject,
    /// `ListPipelines`
    ListPipelines,
    /// `CreatePipeline`
    CreatePipeline,
}

impl RemoteOperation {
    /// Operation name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DescribeStackResource => "DescribeStackResource",
            Self::ListProjects => "ListProjects",
            Self::CreateProject => "CreateProject",
            Self::ListPipelines => "ListPipelines",
            Self::CreatePipeline => "CreatePipeline",
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stack resource lookup (CloudFormation `DescribeStackResource`)
#[async_trait]
pub trait StackResources: Send + Sync {
    /// Returns the physical id of `logical_id` in `stack_name`.
    async fn describe_resource(
        &self,
        logical_id: &str,
        stack_name: &str,
    ) -> Result<String, RemoteError>;
}

/// Build project service (CodeBuild)
#[async_trait]
pub trait BuildProjects: Send + Sync {
    /// Lists the names of every build project in the account.
    async fn list_projects(&self) -> Result<Vec<String>, RemoteError>;

    /// Creates a project and returns its identifier.
    async fn create_project(
        &self,
        definition: &BuildProjectDefinition,
    ) -> Result<String, RemoteError>;
}

/// Pipeline service (CodePipeline)
#[async_trait]
pub trait Pipelines: Send + Sync {
    /// Lists the names of every pipeline in the account.
    async fn list_pipelines(&self) -> Result<Vec<String>, RemoteError>;

    /// Creates a pipeline and returns the remote-assigned name.
    async fn create_pipeline(&self, definition: &PipelineDefinition)
    -> Result<String, RemoteError>;
}

/// Handles for every remote capability a run uses
#[derive(Clone)]
pub struct RemoteClients {
    /// Stack resource lookup
    pub stacks: Arc<dyn StackResources>,
    /// Build project service
    pub projects: Arc<dyn BuildProjects>,
    /// Pipeline service
    pub pipelines: Arc<dyn Pipelines>,
}

impl RemoteClients {
    /// Uses one value for all three capabilities.
    pub fn from_shared<R>(remote: Arc<R>) -> Self
    where
        R: StackResources + BuildProjects + Pipelines + 'static,
    {
        Self {
            stacks: remote.clone(),
            projects: remote.clone(),
            pipelines: remote,
        }
    }
}

impl fmt::Debug for RemoteClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteClients").finish_non_exhaustive()
    }
}
