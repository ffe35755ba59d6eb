//! Build project provisioning

use crate::pipeline::{
    BuildEnvironment, BuildProjectDefinition, BuildProjectHandle, InvocationContext,
    ProvisionError, ResolvedName,
};
use crate::remote::{BuildProjects, RemoteOperation};
use tracing::{debug, info};

/// Makes sure a build project named `name` exists.
///
/// Lists every project and returns early when one with the resolved name is
/// present; nothing is updated in that case. Otherwise the role is checked
/// and a project is created.
///
/// # Errors
///
/// Returns a configuration error when the role is missing, or the remote
/// rejection from either call.
pub async fn ensure_build_project(
    context: &InvocationContext,
    name: &ResolvedName,
    projects: &dyn BuildProjects,
) -> Result<BuildProjectHandle, ProvisionError> {
    let existing = projects
        .list_projects()
        .await
        .map_err(|e| ProvisionError::remote(RemoteOperation::ListProjects.as_str(), e))?;
    debug!(count = existing.len(), "Listed build projects");

    if existing.iter().any(|p| p == name.as_str()) {
        info!(project = %name, "Found existing AWS CodeBuild project");
        return Ok(BuildProjectHandle::Existing(name.to_string()));
    }

    info!(project = %name, "Creating AWS CodeBuild project...");
    let role_arn = context.role_arn()?;
    let definition = build_definition(context, name, role_arn)?;

    let id = projects
        .create_project(&definition)
        .await
        .map_err(|e| ProvisionError::remote(RemoteOperation::CreateProject.as_str(), e))?;
    debug!(project = %id, "Created build project");

    Ok(BuildProjectHandle::Created(id))
}

fn build_definition(
    context: &InvocationContext,
    name: &ResolvedName,
    role_arn: &str,
) -> Result<BuildProjectDefinition, ProvisionError> {
    let ci = context.ci_settings()?;
    Ok(BuildProjectDefinition::for_pipeline(
        name.as_str(),
        BuildEnvironment::linux(&ci.compute_type, &ci.image),
        role_arn,
    ))
}
