//! Provisioning steps and the orchestrator that runs them

pub mod build_project;
pub mod buildspec;
mod orchestrator;
pub mod pipeline;
pub mod resolver;

use crate::pipeline::BUILDSPEC_FILE;
use std::path::PathBuf;

pub use build_project::ensure_build_project;
pub use buildspec::write_build_spec;
pub use orchestrator::Orchestrator;
pub use pipeline::create_pipeline;
pub use resolver::resolve_bucket;

/// Run-wide switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Where the buildspec is written
    pub buildspec_path: PathBuf,
    /// Return an existing pipeline with the resolved name instead of creating
    pub reuse_existing_pipeline: bool,
    /// Reject repository identifiers that are not exactly `owner/name`
    pub strict_repository: bool,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            buildspec_path: PathBuf::from(BUILDSPEC_FILE),
            reuse_existing_pipeline: false,
            strict_repository: false,
        }
    }
}
