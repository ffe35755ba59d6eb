//! Orchestrator
//!
//! Runs the build project, pipeline and buildspec steps concurrently. All
//! three always settle before the outcome is decided, and nothing that was
//! created is rolled back when another step fails.

use super::{ProvisionOptions, create_pipeline, ensure_build_project, write_build_spec};
use crate::pipeline::{
    InvocationContext, Outcome, PipelineCreationError, ProvisionStep, StepFailure,
};
use crate::remote::RemoteClients;
use tracing::{Instrument, error, info, info_span};

/// Drives one provisioning run
#[derive(Debug, Clone)]
pub struct Orchestrator {
    clients: RemoteClients,
    options: ProvisionOptions,
}

impl Orchestrator {
    /// Creates an orchestrator over the given remote handles.
    #[must_use]
    pub fn new(clients: RemoteClients) -> Self {
        Self {
            clients,
            options: ProvisionOptions::default(),
        }
    }

    /// Replaces the run options.
    #[must_use]
    pub fn with_options(mut self, options: ProvisionOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the run options.
    #[must_use]
    pub fn options(&self) -> &ProvisionOptions {
        &self.options
    }

    /// Provisions the build project and pipeline and writes the buildspec.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineCreationError`] holding every step failure.
    pub async fn run(&self, context: &InvocationContext) -> Result<Outcome, PipelineCreationError> {
        let name = context.resolved_name();
        let run_id = uuid::Uuid::new_v4();
        let span = info_span!("awsci", %run_id, name = %name);

        async {
            let (project, pipeline, build_spec) = tokio::join!(
                ensure_build_project(context, &name, self.clients.projects.as_ref()),
                create_pipeline(
                    context,
                    &name,
                    self.clients.stacks.as_ref(),
                    self.clients.pipelines.as_ref(),
                    &self.options,
                ),
                write_build_spec(context, &self.options.buildspec_path),
            );

            match (project, pipeline, build_spec) {
                (Ok(build_project), Ok(pipeline), Ok(build_spec)) => {
                    let outcome = Outcome {
                        resolved_name: name.clone(),
                        build_project,
                        pipeline,
                        build_spec,
                        branch: context.branch.clone(),
                    };
                    info!("{}", outcome.message());
                    Ok(outcome)
                }
                (project, pipeline, build_spec) => {
                    let failures: Vec<StepFailure> = [
                        (ProvisionStep::BuildProject, project.err()),
                        (ProvisionStep::Pipeline, pipeline.err()),
                        (ProvisionStep::BuildSpec, build_spec.err()),
                    ]
                    .into_iter()
                    .filter_map(|(step, error)| error.map(|error| StepFailure { step, error }))
                    .collect();

                    for failure in &failures {
                        error!(step = %failure.step, error = %failure.error, "Provisioning step failed");
                    }
                    Err(PipelineCreationError { failures })
                }
            }
        }
        .instrument(span)
        .await
    }
}
