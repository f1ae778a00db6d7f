//! Cross-reference an AWS console policy-list snapshot against the live set
//! of AWS-managed IAM policies.
//!
//! The [`snapshot`] module extracts a name → type mapping from a saved HTML
//! snapshot of the console's policy table. The [`iam`] module paginates the
//! ListPolicies API and keeps only AWS-owned policies. The [`report`] module
//! joins the two and writes a tab-separated report.

pub mod iam;
pub mod report;
pub mod snapshot;

pub use iam::{
    collect_aws_managed, IamPolicySource, PolicyPage, PolicySource, PolicySummary,
    AWS_MANAGED_PREFIX,
};
pub use report::{render, sort_by_name, write_report};
pub use snapshot::{extract_policy_types, SnapshotError};
