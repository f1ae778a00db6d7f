//! Assemble and write the final TSV report.
//!
//! Joins the live policy records against the snapshot's name → type mapping,
//! defaulting to "Unknown" for policies the snapshot never showed.

use crate::iam::PolicySummary;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const REPORT_HEADER: &str = "PolicyName\tPath\tType";

/// Type label for policies absent from the snapshot mapping.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Sort records case-insensitively by name, ascending. Stable, so records
/// whose names differ only by case keep their listing order.
pub fn sort_by_name(policies: &mut [PolicySummary]) {
    policies.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

/// Render the report: header line, then one tab-separated line per record.
pub fn render(policies: &[PolicySummary], types: &HashMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str(REPORT_HEADER);
    out.push('\n');
    for policy in policies {
        let policy_type = types
            .get(&policy.name)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_TYPE);
        out.push_str(&policy.name);
        out.push('\t');
        out.push_str(&policy.path);
        out.push('\t');
        out.push_str(policy_type);
        out.push('\n');
    }
    out
}

/// Write the rendered report to `path`, truncating any previous run's file.
///
/// The handle lives only for this scope, so it is released whether or not
/// the write succeeds.
pub fn write_report(
    path: &Path,
    policies: &[PolicySummary],
    types: &HashMap<String, String>,
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render(policies, types).as_bytes())
        .with_context(|| format!("writing report {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing report {}", path.display()))?;
    Ok(())
}
