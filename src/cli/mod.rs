//! CLI for awsci
//!
//! - `create`: provision the CodeBuild project and CodePipeline pipeline and
//!   write `buildspec.yml`
//! - `buildspec`: only write `buildspec.yml`

use anyhow::{Context, Result};
use awsci::infrastructure::{AwsRemote, Config, Overrides, init_logging};
use awsci::pipeline::{InvocationContext, Outcome};
use awsci::provision::resolver::DEPLOYMENT_BUCKET_LOGICAL_ID;
use awsci::provision::{Orchestrator, ProvisionOptions, write_build_spec};
use awsci::remote::RemoteClients;
use awsci::remote::memory::InMemoryRemote;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Bucket reported by the dry-run remote.
const DRY_RUN_BUCKET: &str = "dry-run-deployment-bucket";

/// CLI arguments for awsci
#[derive(Parser, Debug)]
#[command(name = "awsci")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, env = "AWSCI_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a CI pipeline using AWS CodePipeline and AWS CodeBuild
    Create {
        #[command(flatten)]
        service: ServiceArgs,

        /// Full GitHub repository (owner/repo) of the source repository
        #[arg(short = 'g', long)]
        repo: String,

        /// GitHub branch to watch for commits
        #[arg(short, long)]
        branch: String,

        /// GitHub personal access token of the source repository
        #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,

        /// AWS profile to load credentials from
        #[arg(long)]
        profile: Option<String>,

        /// Record the requests instead of calling AWS
        #[arg(long)]
        dry_run: bool,

        /// Keep an existing pipeline with the same name instead of creating one
        #[arg(long)]
        reuse_pipeline: bool,

        /// Reject repositories that are not exactly owner/repo
        #[arg(long)]
        strict_repo: bool,
    },

    /// Write buildspec.yml without touching AWS
    Buildspec {
        #[command(flatten)]
        service: ServiceArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct ServiceArgs {
    /// Serverless service file
    #[arg(short, long, default_value = "serverless.yml")]
    config: PathBuf,

    /// Stage, defaults to provider.stage
    #[arg(short, long)]
    stage: Option<String>,

    /// Region, defaults to provider.region
    #[arg(short, long)]
    region: Option<String>,

    /// Where to write the buildspec
    #[arg(long, default_value = awsci::pipeline::BUILDSPEC_FILE)]
    buildspec: PathBuf,
}

impl ServiceArgs {
    fn load(&self) -> Result<Config> {
        Config::load(&self.config)
            .with_context(|| format!("Failed to load {}", self.config.display()))
    }
}

/// Parse and execute CLI arguments
pub async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    match args.command {
        Command::Create {
            service,
            repo,
            branch,
            token,
            profile,
            dry_run,
            reuse_pipeline,
            strict_repo,
        } => {
            let config = service.load()?;
            let context = InvocationContext::from_config(
                &config,
                Overrides {
                    repo,
                    branch,
                    token,
                    stage: service.stage.clone(),
                    region: service.region.clone(),
                },
            );
            let options = ProvisionOptions {
                buildspec_path: service.buildspec.clone(),
                reuse_existing_pipeline: reuse_pipeline,
                strict_repository: strict_repo,
            };

            if dry_run {
                dry_run_create(&context, options).await
            } else {
                let remote = AwsRemote::connect(&context.region, profile.as_deref()).await;
                let orchestrator =
                    Orchestrator::new(RemoteClients::from_shared(Arc::new(remote))).with_options(options);
                let outcome = orchestrator.run(&context).await?;
                report(&outcome);
                Ok(())
            }
        }
        Command::Buildspec { service } => {
            let config = service.load()?;
            let context = InvocationContext::from_config(
                &config,
                Overrides {
                    stage: service.stage.clone(),
                    region: service.region.clone(),
                    ..Overrides::default()
                },
            );
            let document = write_build_spec(&context, &service.buildspec).await?;
            println!("{document}");
            Ok(())
        }
    }
}

async fn dry_run_create(context: &InvocationContext, options: ProvisionOptions) -> Result<()> {
    let remote = Arc::new(InMemoryRemote::new().with_stack_resource(
        context.resolved_name().as_str(),
        DEPLOYMENT_BUCKET_LOGICAL_ID,
        DRY_RUN_BUCKET,
    ));
    let orchestrator =
        Orchestrator::new(RemoteClients::from_shared(remote.clone())).with_options(options);

    let result = orchestrator.run(context).await;
    debug!(calls = ?remote.calls(), "Dry run finished");

    for project in remote.created_projects() {
        println!("# CodeBuild project\n{}", serde_yaml::to_string(&project)?);
    }
    for pipeline in remote.created_pipelines() {
        println!(
            "# CodePipeline pipeline\n{}",
            serde_yaml::to_string(&pipeline.redacted())?
        );
    }

    report(&result?);
    Ok(())
}

fn report(outcome: &Outcome) {
    println!("{}", summary(outcome));
}

// The success message itself is logged by the orchestrator.
fn summary(outcome: &Outcome) -> String {
    format!(
        "Build project: {}\nPipeline: {}",
        outcome.build_project, outcome.pipeline
    )
}
