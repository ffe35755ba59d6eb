//! CodePipeline definition value objects
//!
//! Field names serialize in camelCase so a definition reads the same as the
//! `CreatePipeline` request it becomes.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Configuration key holding the GitHub token on a source action.
pub const OAUTH_TOKEN_KEY: &str = "OAuthToken";

/// Pipeline definition submitted whole to the pipeline service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDefinition {
    /// Pipeline structure version
    pub version: i32,
    /// Pipeline name
    pub name: String,
    /// Where inter-stage artifacts are kept
    pub artifact_store: ArtifactStore,
    /// Role assumed by the pipeline
    pub role_arn: String,
    /// Ordered stages
    pub stages: Vec<StageDefinition>,
}

impl PipelineDefinition {
    /// Returns the stage with the given name.
    pub fn stage(&self, name: &str) -> Option<&StageDefinition> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Returns a copy with every OAuth token masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for action in copy.stages.iter_mut().flat_map(|s| s.actions.iter_mut()) {
            if let Some(token) = action.configuration.get_mut(OAUTH_TOKEN_KEY) {
                *token = "****".to_string();
            }
        }
        copy
    }
}

impl fmt::Display for PipelineDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages = self
            .stages
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        write!(f, "Pipeline({}): {stages}", self.name)
    }
}

/// Artifact store type and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStore {
    /// Store type, always `S3`
    #[serde(rename = "type")]
    pub store_type: String,
    /// Bucket name
    pub location: String,
}

impl ArtifactStore {
    /// S3 store in the given bucket.
    pub fn s3(bucket: impl Into<String>) -> Self {
        Self {
            store_type: "S3".to_string(),
            location: bucket.into(),
        }
    }
}

/// A named stage holding ordered actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDefinition {
    /// Stage name
    pub name: String,
    /// Ordered actions
    pub actions: Vec<ActionDefinition>,
}

impl StageDefinition {
    /// Creates a stage.
    pub fn new(name: impl Into<String>, actions: Vec<ActionDefinition>) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }
}

/// Identifies the provider that runs an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTypeId {
    /// `Source`, `Build`, ...
    pub category: String,
    /// `AWS`, `ThirdParty` or `Custom`
    pub owner: String,
    /// Provider name, e.g. `GitHub` or `CodeBuild`
    pub provider: String,
    /// Provider version
    pub version: String,
}

impl ActionTypeId {
    /// GitHub (version 1) source action.
    pub fn github_source() -> Self {
        Self {
            category: "Source".to_string(),
            owner: "ThirdParty".to_string(),
            provider: "GitHub".to_string(),
            version: "1".to_string(),
        }
    }

    /// CodeBuild build action.
    pub fn codebuild() -> Self {
        Self {
            category: "Build".to_string(),
            owner: "AWS".to_string(),
            provider: "CodeBuild".to_string(),
            version: "1".to_string(),
        }
    }
}

/// Artifact passed between actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact name
    pub name: String,
}

impl Artifact {
    /// Creates an artifact reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single action inside a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    /// Action name
    pub name: String,
    /// Provider of the action
    pub action_type_id: ActionTypeId,
    /// Provider configuration
    pub configuration: BTreeMap<String, String>,
    /// Consumed artifacts
    pub input_artifacts: Vec<Artifact>,
    /// Produced artifacts
    pub output_artifacts: Vec<Artifact>,
    /// Order within the stage
    pub run_order: i32,
}

impl ActionDefinition {
    /// Creates an action with no configuration or artifacts, run order 1.
    pub fn new(name: impl Into<String>, action_type_id: ActionTypeId) -> Self {
        Self {
            name: name.into(),
            action_type_id,
            configuration: BTreeMap::new(),
            input_artifacts: Vec::new(),
            output_artifacts: Vec::new(),
            run_order: 1,
        }
    }

    /// Adds a configuration entry.
    pub fn config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration.insert(key.into(), value.into());
        self
    }

    /// Adds an input artifact.
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.input_artifacts.push(Artifact::new(name));
        self
    }

    /// Adds an output artifact.
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.output_artifacts.push(Artifact::new(name));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PipelineDefinition {
        PipelineDefinition {
            version: 1,
            name: "svc-dev".to_string(),
            artifact_store: ArtifactStore::s3("bucket"),
            role_arn: "arn:role".to_string(),
            stages: vec![
                StageDefinition::new(
                    "Source",
                    vec![
                        ActionDefinition::new("Source", ActionTypeId::github_source())
                            .config("Owner", "acme")
                            .config(OAUTH_TOKEN_KEY, "tok")
                            .output("ServerlessSource"),
                    ],
                ),
                StageDefinition::new(
                    "Deploy",
                    vec![
                        ActionDefinition::new("ServerlessDeploy", ActionTypeId::codebuild())
                            .config("ProjectName", "svc-dev")
                            .input("ServerlessSource"),
                    ],
                ),
            ],
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "Pipeline(svc-dev): Source -> Deploy");
    }

    #[test]
    fn test_redacted_masks_token_only() {
        let redacted = sample().redacted();
        let source = &redacted.stage("Source").unwrap().actions[0];
        assert_eq!(source.configuration[OAUTH_TOKEN_KEY], "****");
        assert_eq!(source.configuration["Owner"], "acme");
        assert_eq!(sample().stage("Source").unwrap().actions[0].configuration[OAUTH_TOKEN_KEY], "tok");
    }

    #[test]
    fn test_serializes_like_the_api() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["artifactStore"]["type"], "S3");
        assert_eq!(json["roleArn"], "arn:role");
        let action = &json["stages"][0]["actions"][0];
        assert_eq!(action["actionTypeId"]["owner"], "ThirdParty");
        assert_eq!(action["outputArtifacts"][0]["name"], "ServerlessSource");
        assert_eq!(action["runOrder"], 1);
    }
}
