//! `policy-census` — cross-reference a saved console policy-list snapshot
//! against the live set of AWS-managed IAM policies.
//!
//! Reads `iam-managed-policy-console.html` from the working directory, pages
//! through IAM ListPolicies, and writes `aws-managed-policies.csv` (tab
//! separated). Credentials and region come from the usual environment chain.

use anyhow::{Context, Result};
use clap::Parser;
use iam_policy_census::{iam, report, snapshot};
use std::path::Path;
use tracing::info;

/// Saved snapshot of the console's managed-policy list page.
const SNAPSHOT_FILE: &str = "iam-managed-policy-console.html";

/// Report output. Tab-separated despite the extension, which is historical.
const REPORT_FILE: &str = "aws-managed-policies.csv";

#[derive(Parser)]
#[command(
    name = "policy-census",
    version,
    about = "Report AWS-managed IAM policies with their console-displayed type"
)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let _cli = Cli::parse();

    let html = std::fs::read_to_string(SNAPSHOT_FILE)
        .with_context(|| format!("reading console snapshot {SNAPSHOT_FILE}"))?;
    let types = snapshot::extract_policy_types(&html)?;
    info!("extracted {} policy types from console snapshot", types.len());

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let source = iam::IamPolicySource::new(aws_sdk_iam::Client::new(&config));
    let mut policies = iam::collect_aws_managed(&source).await?;
    info!("found {} AWS-managed policies", policies.len());

    report::sort_by_name(&mut policies);
    report::write_report(Path::new(REPORT_FILE), &policies, &types)?;
    info!("wrote report to {REPORT_FILE}");

    Ok(())
}
