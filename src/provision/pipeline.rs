//! Pipeline provisioning
//!
//! Assembles the two-stage `Source -> Deploy` definition and submits it.
//! Remote rejections keep the service's own diagnostic.

use super::ProvisionOptions;
use super::resolver::resolve_bucket;
use crate::pipeline::definition::OAUTH_TOKEN_KEY;
use crate::pipeline::{
    ActionDefinition, ActionTypeId, ArtifactStore, DeploymentBucket, InvocationContext,
    PipelineDefinition, PipelineHandle, ProvisionError, ResolvedName, StageDefinition,
};
use crate::remote::{Pipelines, RemoteOperation, StackResources};
use tracing::{debug, info, warn};

/// Artifact handed from the source stage to the deploy stage.
pub const SOURCE_ARTIFACT: &str = "ServerlessSource";

/// Creates the pipeline named `name`.
///
/// The role is checked before anything else, then the bucket is resolved.
/// With [`ProvisionOptions::reuse_existing_pipeline`] a pipeline that already
/// carries the name is returned instead of submitting a duplicate.
///
/// # Errors
///
/// Returns a configuration error for a missing role or bucket, an invalid
/// repository error in strict mode, or the remote rejection unchanged.
pub async fn create_pipeline(
    context: &InvocationContext,
    name: &ResolvedName,
    stacks: &dyn StackResources,
    pipelines: &dyn Pipelines,
    options: &ProvisionOptions,
) -> Result<PipelineHandle, ProvisionError> {
    info!(pipeline = %name, "Creating AWS CodePipeline pipeline...");
    let role_arn = context.role_arn()?;

    if options.strict_repository {
        context.repository.validate_strict()?;
    } else if context.repository.is_incomplete() {
        warn!(
            repository = %context.repository,
            owner = context.repository.owner(),
            repo = context.repository.name(),
            "Repository is not owner/name; the source action will have an empty Owner or Repo"
        );
    }

    let bucket = resolve_bucket(context, name, stacks).await?;

    if options.reuse_existing_pipeline {
        let existing = pipelines
            .list_pipelines()
            .await
            .map_err(|e| ProvisionError::remote(RemoteOperation::ListPipelines.as_str(), e))?;
        if existing.iter().any(|p| p == name.as_str()) {
            info!(pipeline = %name, "Found existing AWS CodePipeline pipeline");
            return Ok(PipelineHandle::Existing(name.to_string()));
        }
    }

    let definition = build_definition(context, name, &bucket, role_arn);
    debug!(definition = %definition, bucket = %bucket, "Submitting pipeline");

    let created = pipelines
        .create_pipeline(&definition)
        .await
        .map_err(|e| ProvisionError::remote(RemoteOperation::CreatePipeline.as_str(), e))?;

    Ok(PipelineHandle::Created(created))
}

/// Builds the `Source -> Deploy` definition.
#[must_use]
pub fn build_definition(
    context: &InvocationContext,
    name: &ResolvedName,
    bucket: &DeploymentBucket,
    role_arn: &str,
) -> PipelineDefinition {
    let source = ActionDefinition::new("Source", ActionTypeId::github_source())
        .config("Owner", context.repository.owner())
        .config("Repo", context.repository.name())
        .config("Branch", context.branch.as_str())
        .config(OAUTH_TOKEN_KEY, context.token.expose())
        .output(SOURCE_ARTIFACT);

    let deploy = ActionDefinition::new("ServerlessDeploy", ActionTypeId::codebuild())
        .config("ProjectName", name.as_str())
        .input(SOURCE_ARTIFACT);

    PipelineDefinition {
        version: 1,
        name: name.to_string(),
        artifact_store: ArtifactStore::s3(bucket.as_str()),
        role_arn: role_arn.to_string(),
        stages: vec![
            StageDefinition::new("Source", vec![source]),
            StageDefinition::new("Deploy", vec![deploy]),
        ],
    }
}
