//! Provisioning domain types
//!
//! Value objects for the invocation context, the pipeline and build project
//! definitions, the buildspec document, and the error taxonomy.

pub mod build_project;
pub mod buildspec;
pub mod context;
pub mod definition;
pub mod errors;
pub mod types;

pub use build_project::{BuildEnvironment, BuildProjectDefinition, TypedMode};
pub use buildspec::{BUILDSPEC_FILE, BuildSpecDocument};
pub use context::{
    CiSettings, DeploymentBucket, InvocationContext, Repository, ResolvedName, Secret,
};
pub use definition::{
    ActionDefinition, ActionTypeId, Artifact, ArtifactStore, PipelineDefinition, StageDefinition,
};
pub use errors::{
    PipelineCreationError, ProvisionError, ProvisionStep, RemoteError, StepFailure,
};
pub use types::{BuildProjectHandle, Outcome, PipelineHandle};
