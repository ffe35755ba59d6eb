//! AWS SDK backed remote
//!
//! Implements the remote capabilities with CloudFormation, CodeBuild and
//! CodePipeline clients built from one shared SDK configuration.

use crate::pipeline::{BuildProjectDefinition, PipelineDefinition, RemoteError};
use crate::remote::{BuildProjects, Pipelines, StackResources};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_codebuild::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_codebuild::types as codebuild;
use aws_sdk_codepipeline::types as codepipeline;
use tracing::debug;

/// Remote backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct AwsRemote {
    cloudformation: aws_sdk_cloudformation::Client,
    codebuild: aws_sdk_codebuild::Client,
    codepipeline: aws_sdk_codepipeline::Client,
}

impl AwsRemote {
    /// Loads credentials from the default provider chain for `region`,
    /// optionally from a named profile.
    pub async fn connect(region: &str, profile: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        Self::from_conf(&loader.load().await)
    }

    /// Builds the service clients from an existing SDK configuration.
    #[must_use]
    pub fn from_conf(config: &SdkConfig) -> Self {
        Self {
            cloudformation: aws_sdk_cloudformation::Client::new(config),
            codebuild: aws_sdk_codebuild::Client::new(config),
            codepipeline: aws_sdk_codepipeline::Client::new(config),
        }
    }
}

fn remote_error<E>(err: E) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(&err).to_string(), str::to_string);
    match err.code() {
        Some(code) => RemoteError::new(message).with_code(code),
        None => RemoteError::new(message),
    }
}

fn invalid_request(err: impl std::fmt::Display) -> RemoteError {
    RemoteError::new(format!("Invalid request: {err}")).with_code("InvalidRequest")
}

#[async_trait]
impl StackResources for AwsRemote {
    async fn describe_resource(
        &self,
        logical_id: &str,
        stack_name: &str,
    ) -> Result<String, RemoteError> {
        debug!(logical_id, stack_name, "DescribeStackResource");
        let output = self
            .cloudformation
            .describe_stack_resource()
            .stack_name(stack_name)
            .logical_resource_id(logical_id)
            .send()
            .await
            .map_err(remote_error)?;

        output
            .stack_resource_detail()
            .and_then(|detail| detail.physical_resource_id())
            .map(str::to_string)
            .ok_or_else(|| {
                RemoteError::new(format!("{logical_id} in {stack_name} has no physical id"))
            })
    }
}

#[async_trait]
impl BuildProjects for AwsRemote {
    async fn list_projects(&self) -> Result<Vec<String>, RemoteError> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .codebuild
                .list_projects()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(remote_error)?;
            names.extend(output.projects().iter().cloned());

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(count = names.len(), "ListProjects");
        Ok(names)
    }

    async fn create_project(
        &self,
        definition: &BuildProjectDefinition,
    ) -> Result<String, RemoteError> {
        let (artifacts, environment, source) = project_parts(definition)?;

        let output = self
            .codebuild
            .create_project()
            .name(&definition.name)
            .artifacts(artifacts)
            .environment(environment)
            .source(source)
            .service_role(&definition.service_role)
            .send()
            .await
            .map_err(remote_error)?;

        Ok(output
            .project()
            .and_then(|project| project.arn())
            .unwrap_or(&definition.name)
            .to_string())
    }
}

#[async_trait]
impl Pipelines for AwsRemote {
    async fn list_pipelines(&self) -> Result<Vec<String>, RemoteError> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .codepipeline
                .list_pipelines()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(remote_error)?;
            names.extend(
                output
                    .pipelines()
                    .iter()
                    .filter_map(|summary| summary.name().map(str::to_string)),
            );

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(count = names.len(), "ListPipelines");
        Ok(names)
    }

    async fn create_pipeline(
        &self,
        definition: &PipelineDefinition,
    ) -> Result<String, RemoteError> {
        let declaration = pipeline_declaration(definition)?;

        let output = self
            .codepipeline
            .create_pipeline()
            .pipeline(declaration)
            .send()
            .await
            .map_err(remote_error)?;

        Ok(output
            .pipeline()
            .map_or_else(|| definition.name.clone(), |p| p.name().to_string()))
    }
}

fn project_parts(
    definition: &BuildProjectDefinition,
) -> Result<
    (
        codebuild::ProjectArtifacts,
        codebuild::ProjectEnvironment,
        codebuild::ProjectSource,
    ),
    RemoteError,
> {
    let artifacts = codebuild::ProjectArtifacts::builder()
        .r#type(codebuild::ArtifactsType::from(
            definition.artifacts.mode.as_str(),
        ))
        .build()
        .map_err(invalid_request)?;

    let environment = codebuild::ProjectEnvironment::builder()
        .r#type(codebuild::EnvironmentType::from(
            definition.environment.container_type.as_str(),
        ))
        .image(&definition.environment.image)
        .compute_type(codebuild::ComputeType::from(
            definition.environment.compute_type.as_str(),
        ))
        .build()
        .map_err(invalid_request)?;

    let source = codebuild::ProjectSource::builder()
        .r#type(codebuild::SourceType::from(definition.source.mode.as_str()))
        .build()
        .map_err(invalid_request)?;

    Ok((artifacts, environment, source))
}

fn pipeline_declaration(
    definition: &PipelineDefinition,
) -> Result<codepipeline::PipelineDeclaration, RemoteError> {
    let artifact_store = codepipeline::ArtifactStore::builder()
        .r#type(codepipeline::ArtifactStoreType::from(
            definition.artifact_store.store_type.as_str(),
        ))
        .location(&definition.artifact_store.location)
        .build()
        .map_err(invalid_request)?;

    let mut pipeline = codepipeline::PipelineDeclaration::builder()
        .name(&definition.name)
        .version(definition.version)
        .role_arn(&definition.role_arn)
        .artifact_store(artifact_store);

    for stage in &definition.stages {
        let mut declaration = codepipeline::StageDeclaration::builder().name(&stage.name);

        for action in &stage.actions {
            let type_id = codepipeline::ActionTypeId::builder()
                .category(codepipeline::ActionCategory::from(
                    action.action_type_id.category.as_str(),
                ))
                .owner(codepipeline::ActionOwner::from(
                    action.action_type_id.owner.as_str(),
                ))
                .provider(&action.action_type_id.provider)
                .version(&action.action_type_id.version)
                .build()
                .map_err(invalid_request)?;

            let mut builder = codepipeline::ActionDeclaration::builder()
                .name(&action.name)
                .action_type_id(type_id)
                .run_order(action.run_order)
                .set_configuration(Some(
                    action
                        .configuration
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                ));

            for artifact in &action.input_artifacts {
                builder = builder.input_artifacts(
                    codepipeline::InputArtifact::builder()
                        .name(&artifact.name)
                        .build()
                        .map_err(invalid_request)?,
                );
            }
            for artifact in &action.output_artifacts {
                builder = builder.output_artifacts(
                    codepipeline::OutputArtifact::builder()
                        .name(&artifact.name)
                        .build()
                        .map_err(invalid_request)?,
                );
            }

            declaration = declaration.actions(builder.build().map_err(invalid_request)?);
        }

        pipeline = pipeline.stages(declaration.build().map_err(invalid_request)?);
    }

    pipeline.build().map_err(invalid_request)
}
