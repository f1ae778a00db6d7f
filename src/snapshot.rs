//! Extract policy name → type labels from a saved console snapshot.
//!
//! The AWS console renders its managed-policy list as an Angular `iam-table`
//! with one row per policy. The snapshot is a one-off manual save of that
//! page, so the extraction is deliberately strict: any deviation from the
//! expected nesting is an error, never a silent skip.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use thiserror::Error;

/// Structural failure while walking the snapshot's policy table.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid selector `{0}`")]
    Selector(String),
    #[error("no iam-table with class `policies-table` in document")]
    MissingTable,
    #[error("policy table has no `body ng-isolate-scope` container")]
    MissingBody,
    #[error("row has no policy-name cell")]
    MissingNameCell,
    #[error("policy-name cell has no name-with-icon span")]
    MissingNameSpan,
    #[error("policy-name span has no anchor")]
    MissingNameAnchor,
    #[error("could not find policy type in row: {0}")]
    MissingTypeCell(String),
    #[error("type cell has no direct child span")]
    MissingTypeOuterSpan,
    #[error("type span has no direct child span")]
    MissingTypeInnerSpan,
}

/// Parsed selectors for the console table's class structure.
///
/// The console emits multi-token class attributes; rows in particular carry
/// one of exactly two literal class strings depending on selection state, so
/// each selector matches the full attribute value rather than a class token.
struct Selectors {
    table: Selector,
    body: Selector,
    row: Selector,
    name_cell: Selector,
    name_span: Selector,
    name_anchor: Selector,
    type_cell: Selector,
}

impl Selectors {
    fn new() -> Result<Self, SnapshotError> {
        Ok(Self {
            table: parse("iam-table.policies-table")?,
            body: parse(r#"div[class="body ng-isolate-scope"]"#)?,
            row: parse(
                r#"div[class="row pointer ng-scope"], div[class="row pointer ng-scope selected"]"#,
            )?,
            name_cell: parse(r#"div[class="cell ng-scope ng-isolate-scope policy-name"]"#)?,
            name_span: parse(r#"span[class="ng-scope policy-name-with-icon"]"#)?,
            name_anchor: parse("a")?,
            type_cell: parse(r#"div[class="cell ng-scope ng-isolate-scope type"]"#)?,
        })
    }
}

fn parse(css: &str) -> Result<Selector, SnapshotError> {
    Selector::parse(css).map_err(|_| SnapshotError::Selector(css.to_string()))
}

/// Extract the policy name → type mapping from snapshot HTML.
///
/// Walks the unique policy table, its body container, and every row marked
/// with one of the two accepted row class strings. Later rows overwrite
/// earlier ones if a name repeats (rows are unique by name in practice).
pub fn extract_policy_types(html: &str) -> Result<HashMap<String, String>, SnapshotError> {
    let selectors = Selectors::new()?;
    let document = Html::parse_document(html);

    let table = document
        .select(&selectors.table)
        .next()
        .ok_or(SnapshotError::MissingTable)?;
    let body = table
        .select(&selectors.body)
        .next()
        .ok_or(SnapshotError::MissingBody)?;

    let mut types = HashMap::new();
    for row in body.select(&selectors.row) {
        let name = row_policy_name(row, &selectors)?;
        let policy_type = row_policy_type(row, &selectors)?;
        types.insert(name, policy_type);
    }

    Ok(types)
}

/// Name lives in the row's name cell, inside a span, inside an anchor.
fn row_policy_name(row: ElementRef<'_>, selectors: &Selectors) -> Result<String, SnapshotError> {
    let cell = row
        .select(&selectors.name_cell)
        .next()
        .ok_or(SnapshotError::MissingNameCell)?;
    let span = cell
        .select(&selectors.name_span)
        .next()
        .ok_or(SnapshotError::MissingNameSpan)?;
    let anchor = span
        .select(&selectors.name_anchor)
        .next()
        .ok_or(SnapshotError::MissingNameAnchor)?;
    Ok(trimmed_text(anchor))
}

/// Type lives two spans deep in the type cell. Both lookups inspect only
/// immediate children; the console nests unrelated spans further down.
fn row_policy_type(row: ElementRef<'_>, selectors: &Selectors) -> Result<String, SnapshotError> {
    let cell = row
        .select(&selectors.type_cell)
        .next()
        .ok_or_else(|| SnapshotError::MissingTypeCell(row.html()))?;
    let outer = direct_child_span(cell).ok_or(SnapshotError::MissingTypeOuterSpan)?;
    let inner = direct_child_span(outer).ok_or(SnapshotError::MissingTypeInnerSpan)?;
    Ok(trimmed_text(inner))
}

fn direct_child_span(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "span")
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
