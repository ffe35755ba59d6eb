//! Results of the provisioning steps

#![allow(clippy::must_use_candidate)]

use crate::pipeline::buildspec::{BUILDSPEC_FILE, BuildSpecDocument};
use crate::pipeline::context::ResolvedName;
use serde::Serialize;
use std::fmt;

/// Build project that the pipeline deploys through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "id", rename_all = "lowercase")]
pub enum BuildProjectHandle {
    /// A project with the resolved name already existed
    Existing(String),
    /// The project was created; holds the remote identifier
    Created(String),
}

/// Pipeline produced by a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "id", rename_all = "lowercase")]
pub enum PipelineHandle {
    /// A pipeline with the resolved name already existed (reuse mode only)
    Existing(String),
    /// The pipeline was created; holds the remote-assigned name
    Created(String),
}

macro_rules! handle_accessors {
    ($ty:ident) => {
        impl $ty {
            /// Remote identifier of the resource.
            pub fn id(&self) -> &str {
                match self {
                    Self::Existing(id) | Self::Created(id) => id,
                }
            }

            /// Returns true when this run created the resource.
            pub fn is_created(&self) -> bool {
                matches!(self, Self::Created(_))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    Self::Existing(id) => write!(f, "{id} (existing)"),
                    Self::Created(id) => write!(f, "{id} (created)"),
                }
            }
        }
    };
}

handle_accessors!(BuildProjectHandle);
handle_accessors!(PipelineHandle);

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Name shared by the build project and the pipeline
    pub resolved_name: ResolvedName,
    /// Build project used by the deploy stage
    pub build_project: BuildProjectHandle,
    /// Pipeline
    pub pipeline: PipelineHandle,
    /// Buildspec that was written
    pub build_spec: BuildSpecDocument,
    /// Branch that must receive the buildspec
    pub branch: String,
}

impl Outcome {
    /// Follow-up instruction shown to the user.
    pub fn message(&self) -> String {
        format!(
            "The pipeline was successfully created.\n\
             You must commit the created {BUILDSPEC_FILE} file to the \"{}\" branch.",
            self.branch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::fixtures::context;

    #[test]
    fn test_handle_accessors() {
        let existing = BuildProjectHandle::Existing("svc-dev".to_string());
        assert_eq!(existing.id(), "svc-dev");
        assert!(!existing.is_created());
        assert_eq!(existing.to_string(), "svc-dev (existing)");

        let created = PipelineHandle::Created("svc-dev".to_string());
        assert!(created.is_created());
        assert_eq!(created.to_string(), "svc-dev (created)");
    }

    #[test]
    fn test_handle_serialize() {
        let json = serde_json::to_string(&PipelineHandle::Created("p".to_string())).unwrap();
        assert_eq!(json, r#"{"status":"created","id":"p"}"#);
    }

    #[test]
    fn test_outcome_message_names_branch() {
        let ctx = context();
        let outcome = Outcome {
            resolved_name: ctx.resolved_name(),
            build_project: BuildProjectHandle::Existing("svc-dev".to_string()),
            pipeline: PipelineHandle::Created("svc-dev".to_string()),
            build_spec: BuildSpecDocument::render("deploy", "dev", "us-east-1"),
            branch: ctx.branch.clone(),
        };

        assert_eq!(
            outcome.message(),
            "The pipeline was successfully created.\nYou must commit the created buildspec.yml file to the \"main\" branch."
        );
    }
}
