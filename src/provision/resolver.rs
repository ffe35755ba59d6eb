//! Deployment bucket resolution

use crate::pipeline::errors::BUCKET_NOT_FOUND;
use crate::pipeline::{DeploymentBucket, InvocationContext, ProvisionError, ResolvedName};
use crate::remote::StackResources;
use tracing::debug;

/// Logical id of the bucket in a Serverless stack.
pub const DEPLOYMENT_BUCKET_LOGICAL_ID: &str = "ServerlessDeploymentBucket";

/// Resolves the artifact bucket for the pipeline.
///
/// A non-blank bucket in the context wins without any remote call. Otherwise
/// the bucket is looked up in the `{service}-{stage}` stack; any lookup
/// failure becomes a fixed configuration error.
///
/// # Errors
///
/// Returns [`ProvisionError::Configuration`] when the lookup fails.
pub async fn resolve_bucket(
    context: &InvocationContext,
    stack_name: &ResolvedName,
    stacks: &dyn StackResources,
) -> Result<DeploymentBucket, ProvisionError> {
    if let Some(bucket) = context
        .deployment_bucket
        .as_ref()
        .filter(|bucket| !bucket.trim().is_empty())
    {
        debug!(bucket = %bucket, "Using configured deployment bucket");
        return Ok(DeploymentBucket::new(bucket.clone()));
    }

    match stacks
        .describe_resource(DEPLOYMENT_BUCKET_LOGICAL_ID, stack_name.as_str())
        .await
    {
        Ok(physical_id) => {
            debug!(stack = %stack_name, bucket = %physical_id, "Resolved deployment bucket");
            Ok(DeploymentBucket::new(physical_id))
        }
        Err(err) => {
            debug!(stack = %stack_name, error = %err, "Deployment bucket lookup failed");
            Err(ProvisionError::configuration(BUCKET_NOT_FOUND))
        }
    }
}
