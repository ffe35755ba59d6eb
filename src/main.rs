//! awsci - provision a CI pipeline for a Serverless service
//!
//! Creates (or reuses) an AWS CodeBuild project, creates a two-stage AWS
//! CodePipeline pipeline (GitHub source, CodeBuild deploy), and writes the
//! `buildspec.yml` the deploy stage runs.
//!
//! ## Quick Start
//!
//! ```bash
//! # Provision everything for the stage in serverless.yml
//! awsci create --repo acme/widgets --branch main --token "$GITHUB_TOKEN"
//!
//! # See what would be submitted without calling AWS
//! awsci create -g acme/widgets -b main -t "$GITHUB_TOKEN" --stage prod --dry-run
//!
//! # Only regenerate buildspec.yml
//! awsci buildspec --stage prod --region eu-west-1
//! ```

use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if std::env::var("AWSCI_VERBOSE").is_ok() {
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
