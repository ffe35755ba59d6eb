//! End-to-end provisioning runs against the in-memory remote

use awsci::pipeline::ProvisionStep;
use awsci::prelude::*;
use awsci::provision::resolver::DEPLOYMENT_BUCKET_LOGICAL_ID;
use awsci::{Config, Overrides};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::sync::Arc;

fn context(service_yaml: &str) -> InvocationContext {
    let config = Config::from_yaml_str(service_yaml).unwrap();
    InvocationContext::from_config(
        &config,
        Overrides {
            repo: "acme/widgets".to_string(),
            branch: "main".to_string(),
            token: "tok".to_string(),
            stage: Some("dev".to_string()),
            region: Some("us-east-1".to_string()),
        },
    )
}

fn orchestrator(remote: &Arc<InMemoryRemote>, dir: &tempfile::TempDir) -> Orchestrator {
    Orchestrator::new(RemoteClients::from_shared(remote.clone())).with_options(ProvisionOptions {
        buildspec_path: dir.path().join("buildspec.yml"),
        ..ProvisionOptions::default()
    })
}

#[tokio::test]
async fn provisions_build_project_pipeline_and_buildspec() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new().with_stack_resource(
        "svc-dev",
        DEPLOYMENT_BUCKET_LOGICAL_ID,
        "svc-dev-serverlessdeploymentbucket",
    ));
    let ctx = context("service: svc\ncustom:\n  awsCI:\n    roleArn: arn:role\n");

    let outcome = orchestrator(&remote, &dir).run(&ctx).await.unwrap();

    assert_eq!(outcome.resolved_name.as_str(), "svc-dev");

    let pipeline = remote.created_pipelines().remove(0);
    assert_eq!(pipeline.name, "svc-dev");
    assert_eq!(pipeline.artifact_store.location, "svc-dev-serverlessdeploymentbucket");

    let source: BTreeMap<_, _> = pipeline.stages[0].actions[0]
        .configuration
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        source,
        BTreeMap::from([
            ("Branch", "main"),
            ("OAuthToken", "tok"),
            ("Owner", "acme"),
            ("Repo", "widgets"),
        ])
    );
    assert_eq!(
        pipeline.stages[1].actions[0].configuration["ProjectName"],
        "svc-dev"
    );
    assert_eq!(remote.created_projects()[0].name, "svc-dev");

    let written = std::fs::read_to_string(dir.path().join("buildspec.yml")).unwrap();
    assert_eq!(written, outcome.build_spec.as_str());
    assert!(written.contains("--stage \"dev\" --region \"us-east-1\""));
}

#[tokio::test]
async fn explicit_bucket_skips_stack_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new());
    let ctx = context(
        "service: svc\nprovider:\n  deploymentBucket: my-bucket\ncustom:\n  awsCI:\n    roleArn: arn:role\n",
    );

    orchestrator(&remote, &dir).run(&ctx).await.unwrap();

    assert_eq!(
        remote.created_pipelines()[0].artifact_store.location,
        "my-bucket"
    );
    assert_eq!(
        remote.count_calls(|c| matches!(
            c,
            awsci::remote::memory::RemoteCall::DescribeStackResource { .. }
        )),
        0
    );
}

#[tokio::test]
async fn missing_role_fails_provisioners_but_writes_buildspec() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new());
    let ctx = context("service: svc\ncustom:\n  awsCI: {}\n");

    let err = orchestrator(&remote, &dir).run(&ctx).await.unwrap_err();

    assert!(
        err.failure_of(ProvisionStep::BuildProject)
            .is_some_and(ProvisionError::is_configuration)
    );
    assert!(
        err.failure_of(ProvisionStep::Pipeline)
            .is_some_and(ProvisionError::is_configuration)
    );
    assert!(err.to_string().contains("roleArn missing"));
    assert!(dir.path().join("buildspec.yml").exists());
    assert!(remote.created_projects().is_empty());
    assert!(remote.created_pipelines().is_empty());
}

#[tokio::test]
async fn missing_ci_block_fails_every_step() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(InMemoryRemote::new());
    let ctx = context("service: svc\n");

    let err = orchestrator(&remote, &dir).run(&ctx).await.unwrap_err();

    assert_eq!(err.failures.len(), 3);
    assert!(!dir.path().join("buildspec.yml").exists());
}
