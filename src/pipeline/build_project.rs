//! CodeBuild project definition

#![allow(clippy::must_use_candidate)]

use serde::{Deserialize, Serialize};

/// Artifact and source mode for projects driven by CodePipeline.
pub const CODEPIPELINE: &str = "CODEPIPELINE";

/// Container type used by every project.
pub const LINUX_CONTAINER: &str = "LINUX_CONTAINER";

/// Build project submitted when none with the resolved name exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildProjectDefinition {
    /// Project name
    pub name: String,
    /// Artifact mode
    pub artifacts: TypedMode,
    /// Build environment
    pub environment: BuildEnvironment,
    /// Source mode
    pub source: TypedMode,
    /// Role assumed by the build
    pub service_role: String,
}

impl BuildProjectDefinition {
    /// Project whose source and artifacts both come from CodePipeline.
    pub fn for_pipeline(
        name: impl Into<String>,
        environment: BuildEnvironment,
        service_role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artifacts: TypedMode::codepipeline(),
            environment,
            source: TypedMode::codepipeline(),
            service_role: service_role.into(),
        }
    }
}

/// `{ type: ... }` block used for both artifacts and source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedMode {
    /// Mode name
    #[serde(rename = "type")]
    pub mode: String,
}

impl TypedMode {
    /// The `CODEPIPELINE` mode.
    pub fn codepipeline() -> Self {
        Self {
            mode: CODEPIPELINE.to_string(),
        }
    }
}

/// Build environment descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildEnvironment {
    /// Compute size
    pub compute_type: String,
    /// Container image
    pub image: String,
    /// Container type
    #[serde(rename = "type")]
    pub container_type: String,
}

impl BuildEnvironment {
    /// Linux container environment.
    pub fn linux(compute_type: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            compute_type: compute_type.into(),
            image: image.into(),
            container_type: LINUX_CONTAINER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_pipeline_serialization() {
        let project = BuildProjectDefinition::for_pipeline(
            "svc-dev",
            BuildEnvironment::linux("BUILD_GENERAL1_SMALL", "aws/codebuild/nodejs:7.0.0"),
            "arn:role",
        );

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["name"], "svc-dev");
        assert_eq!(json["artifacts"]["type"], CODEPIPELINE);
        assert_eq!(json["source"]["type"], CODEPIPELINE);
        assert_eq!(json["environment"]["type"], LINUX_CONTAINER);
        assert_eq!(json["environment"]["computeType"], "BUILD_GENERAL1_SMALL");
        assert_eq!(json["serviceRole"], "arn:role");
    }
}
