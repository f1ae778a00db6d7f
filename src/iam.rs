//! Paginated IAM policy listing, filtered to AWS-owned policies.
//!
//! The listing API sits behind the [`PolicySource`] trait so the pagination
//! loop and ARN filtering can be exercised without credentials; the real
//! implementation wraps the IAM SDK client and follows `Marker` continuation
//! tokens until `IsTruncated` clears.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// ARN prefix shared by every AWS-owned managed policy.
pub const AWS_MANAGED_PREFIX: &str = "arn:aws:iam::aws:";

/// One policy record from the listing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySummary {
    pub name: String,
    pub arn: String,
    pub path: String,
}

/// One page of listing results plus the continuation marker, if any.
#[derive(Debug, Default)]
pub struct PolicyPage {
    pub policies: Vec<PolicySummary>,
    pub marker: Option<String>,
}

/// A paginated source of IAM policy records.
#[async_trait]
pub trait PolicySource {
    /// Fetch one page. `marker` is `None` for the first page, otherwise the
    /// continuation token returned by the previous page.
    async fn list_policies(&self, marker: Option<String>) -> Result<PolicyPage>;
}

/// Live IAM listing via the AWS SDK.
pub struct IamPolicySource {
    client: aws_sdk_iam::Client,
}

impl IamPolicySource {
    pub fn new(client: aws_sdk_iam::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PolicySource for IamPolicySource {
    async fn list_policies(&self, marker: Option<String>) -> Result<PolicyPage> {
        let mut request = self.client.list_policies();
        if let Some(marker) = marker {
            request = request.marker(marker);
        }
        let output = request
            .send()
            .await
            .context("IAM ListPolicies call failed")?;

        let policies = output
            .policies()
            .iter()
            .filter_map(|policy| {
                let name = policy.policy_name()?;
                let arn = policy.arn()?;
                Some(PolicySummary {
                    name: name.to_string(),
                    arn: arn.to_string(),
                    path: policy.path().unwrap_or("/").to_string(),
                })
            })
            .collect();

        let marker = if output.is_truncated() {
            output.marker().map(str::to_string)
        } else {
            None
        };

        Ok(PolicyPage { policies, marker })
    }
}

/// Drive pagination to exhaustion and keep only AWS-owned policies.
///
/// Record order is preserved across pages. Errors from the source propagate
/// unmodified; this is a one-shot reporting run with no retry.
pub async fn collect_aws_managed(source: &dyn PolicySource) -> Result<Vec<PolicySummary>> {
    let mut managed = Vec::new();
    let mut marker = None;
    let mut pages = 0usize;

    loop {
        let page = source.list_policies(marker.take()).await?;
        pages += 1;
        for policy in page.policies {
            if policy.arn.starts_with(AWS_MANAGED_PREFIX) {
                managed.push(policy);
            }
        }
        match page.marker {
            Some(next) => marker = Some(next),
            None => break,
        }
    }

    debug!(
        "collected {} AWS-managed policies across {pages} pages",
        managed.len()
    );
    Ok(managed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    fn summary(name: &str, arn: &str) -> PolicySummary {
        PolicySummary {
            name: name.to_string(),
            arn: arn.to_string(),
            path: "/".to_string(),
        }
    }

    fn managed(name: &str) -> PolicySummary {
        summary(name, &format!("arn:aws:iam::aws:policy/{name}"))
    }

    /// Serves pre-built pages, using the page index as the marker.
    struct FakeSource {
        pages: Vec<Vec<PolicySummary>>,
    }

    #[async_trait]
    impl PolicySource for FakeSource {
        async fn list_policies(&self, marker: Option<String>) -> Result<PolicyPage> {
            let index: usize = match marker {
                Some(m) => m.parse().unwrap(),
                None => 0,
            };
            let policies = self.pages.get(index).cloned().unwrap_or_default();
            let marker = if index + 1 < self.pages.len() {
                Some((index + 1).to_string())
            } else {
                None
            };
            Ok(PolicyPage { policies, marker })
        }
    }

    /// Fails on the second page, mid-pagination.
    struct FailingSource;

    #[async_trait]
    impl PolicySource for FailingSource {
        async fn list_policies(&self, marker: Option<String>) -> Result<PolicyPage> {
            if marker.is_some() {
                bail!("throttled");
            }
            Ok(PolicyPage {
                policies: vec![managed("AdministratorAccess")],
                marker: Some("1".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_pagination_accumulates_across_pages_in_order() {
        let source = FakeSource {
            pages: vec![
                vec![managed("AdministratorAccess"), managed("PowerUserAccess")],
                vec![managed("ReadOnlyAccess")],
            ],
        };

        let policies = collect_aws_managed(&source).await.unwrap();
        let names: Vec<&str> = policies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["AdministratorAccess", "PowerUserAccess", "ReadOnlyAccess"]
        );
    }

    #[tokio::test]
    async fn test_customer_policies_are_filtered_out() {
        let source = FakeSource {
            pages: vec![vec![
                managed("ReadOnlyAccess"),
                summary("Custom", "arn:aws:iam::123456789012:policy/Custom"),
            ]],
        };

        let policies = collect_aws_managed(&source).await.unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].name, "ReadOnlyAccess");
    }

    #[tokio::test]
    async fn test_empty_listing_yields_empty_result() {
        let source = FakeSource { pages: vec![] };
        let policies = collect_aws_managed(&source).await.unwrap();
        assert!(policies.is_empty());
    }

    #[tokio::test]
    async fn test_mid_pagination_error_propagates() {
        let err = collect_aws_managed(&FailingSource).await.unwrap_err();
        assert!(err.to_string().contains("throttled"));
    }
}
