//! Prelude module for common imports

pub use crate::pipeline::{
    BuildProjectHandle, BuildSpecDocument, CiSettings, InvocationContext, Outcome,
    PipelineCreationError, PipelineHandle, ProvisionError, ProvisionStep, Repository,
    ResolvedName, Secret,
};
pub use crate::provision::{
    Orchestrator, ProvisionOptions, create_pipeline, ensure_build_project, resolve_bucket,
    write_build_spec,
};
pub use crate::remote::memory::InMemoryRemote;
pub use crate::remote::{BuildProjects, Pipelines, RemoteClients, StackResources};
