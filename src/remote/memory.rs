//! In-memory remote used by dry runs and tests
//!
//! Records every call and the definitions it was handed. Created resources
//! are remembered, so a second run against the same instance behaves like a
//! re-run against a real account.

use super::{BuildProjects, Pipelines, RemoteOperation, StackResources};
use crate::pipeline::{BuildProjectDefinition, PipelineDefinition, RemoteError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A call observed by [`InMemoryRemote`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    /// Stack resource lookup
    DescribeStackResource {
        /// Logical resource id
        logical_id: String,
        /// Stack name
        stack_name: String,
    },
    /// Project listing
    ListProjects,
    /// Project creation, by name
    CreateProject(String),
    /// Pipeline listing
    ListPipelines,
    /// Pipeline creation, by name
    CreatePipeline(String),
}

#[derive(Debug, Default)]
struct State {
    stack_resources: HashMap<(String, String), String>,
    projects: Vec<String>,
    pipelines: Vec<String>,
    failures: HashMap<RemoteOperation, String>,
    calls: Vec<RemoteCall>,
    created_projects: Vec<BuildProjectDefinition>,
    created_pipelines: Vec<PipelineDefinition>,
}

impl State {
    fn fail_if_configured(&self, operation: RemoteOperation) -> Result<(), RemoteError> {
        match self.failures.get(&operation) {
            Some(message) => Err(RemoteError::new(message.clone())),
            None => Ok(()),
        }
    }
}

/// Recording substitute for every remote capability
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    state: Mutex<State>,
}

impl InMemoryRemote {
    /// Creates an empty remote: no stacks, projects or pipelines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stack resource.
    #[must_use]
    pub fn with_stack_resource(
        self,
        stack_name: impl Into<String>,
        logical_id: impl Into<String>,
        physical_id: impl Into<String>,
    ) -> Self {
        self.state
            .lock()
            .stack_resources
            .insert((stack_name.into(), logical_id.into()), physical_id.into());
        self
    }

    /// Registers an existing build project.
    #[must_use]
    pub fn with_project(self, name: impl Into<String>) -> Self {
        self.state.lock().projects.push(name.into());
        self
    }

    /// Registers an existing pipeline.
    #[must_use]
    pub fn with_pipeline(self, name: impl Into<String>) -> Self {
        self.state.lock().pipelines.push(name.into());
        self
    }

    /// Makes `operation` fail with `message`.
    #[must_use]
    pub fn failing(self, operation: RemoteOperation, message: impl Into<String>) -> Self {
        self.state.lock().failures.insert(operation, message.into());
        self
    }

    /// Every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&RemoteCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Build projects submitted for creation.
    #[must_use]
    pub fn created_projects(&self) -> Vec<BuildProjectDefinition> {
        self.state.lock().created_projects.clone()
    }

    /// Pipelines submitted for creation.
    #[must_use]
    pub fn created_pipelines(&self) -> Vec<PipelineDefinition> {
        self.state.lock().created_pipelines.clone()
    }
}

#[async_trait]
impl StackResources for InMemoryRemote {
    async fn describe_resource(
        &self,
        logical_id: &str,
        stack_name: &str,
    ) -> Result<String, RemoteError> {
        let mut state = self.state.lock();
        state.calls.push(RemoteCall::DescribeStackResource {
            logical_id: logical_id.to_string(),
            stack_name: stack_name.to_string(),
        });
        state.fail_if_configured(RemoteOperation::DescribeStackResource)?;

        state
            .stack_resources
            .get(&(stack_name.to_string(), logical_id.to_string()))
            .cloned()
            .ok_or_else(|| {
                RemoteError::new(format!(
                    "Resource {logical_id} does not exist for stack {stack_name}"
                ))
                .with_code("ValidationError")
            })
    }
}

#[async_trait]
impl BuildProjects for InMemoryRemote {
    async fn list_projects(&self) -> Result<Vec<String>, RemoteError> {
        let mut state = self.state.lock();
        state.calls.push(RemoteCall::ListProjects);
        state.fail_if_configured(RemoteOperation::ListProjects)?;
        Ok(state.projects.clone())
    }

    async fn create_project(
        &self,
        definition: &BuildProjectDefinition,
    ) -> Result<String, RemoteError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(RemoteCall::CreateProject(definition.name.clone()));
        state.fail_if_configured(RemoteOperation::CreateProject)?;

        if state.projects.contains(&definition.name) {
            return Err(RemoteError::new(format!(
                "Project already exists: {}",
                definition.name
            ))
            .with_code("ResourceAlreadyExistsException"));
        }

        state.projects.push(definition.name.clone());
        state.created_projects.push(definition.clone());
        Ok(definition.name.clone())
    }
}

#[async_trait]
impl Pipelines for InMemoryRemote {
    async fn list_pipelines(&self) -> Result<Vec<String>, RemoteError> {
        let mut state = self.state.lock();
        state.calls.push(RemoteCall::ListPipelines);
        state.fail_if_configured(RemoteOperation::ListPipelines)?;
        Ok(state.pipelines.clone())
    }

    async fn create_pipeline(
        &self,
        definition: &PipelineDefinition,
    ) -> Result<String, RemoteError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(RemoteCall::CreatePipeline(definition.name.clone()));
        state.fail_if_configured(RemoteOperation::CreatePipeline)?;

        if state.pipelines.contains(&definition.name) {
            return Err(RemoteError::new(format!(
                "A pipeline with name '{}' already exists",
                definition.name
            ))
            .with_code("PipelineNameInUseException"));
        }

        state.pipelines.push(definition.name.clone());
        state.created_pipelines.push(definition.clone());
        Ok(definition.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BuildEnvironment;

    #[tokio::test]
    async fn test_describe_unknown_resource_fails() {
        let remote = InMemoryRemote::new();
        let err = remote
            .describe_resource("ServerlessDeploymentBucket", "svc-dev")
            .await
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some("ValidationError"));
        assert_eq!(remote.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_created_project_is_listed() {
        let remote = InMemoryRemote::new();
        let project = BuildProjectDefinition::for_pipeline(
            "svc-dev",
            BuildEnvironment::linux("BUILD_GENERAL1_SMALL", "image"),
            "arn:role",
        );

        remote.create_project(&project).await.unwrap();
        assert_eq!(remote.list_projects().await.unwrap(), vec!["svc-dev"]);
        assert!(remote.create_project(&project).await.is_err());
        assert_eq!(remote.created_projects().len(), 1);
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let remote = InMemoryRemote::new().failing(RemoteOperation::ListProjects, "throttled");
        let err = remote.list_projects().await.unwrap_err();
        assert_eq!(err.message, "throttled");
        assert_eq!(remote.calls(), vec![RemoteCall::ListProjects]);
    }
}
