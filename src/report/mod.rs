//! Loading xUnit and Checkstyle XML reports.
//!
//! The root element decides the report kind; everything below it is read in
//! a single pass over the `roxmltree` document.

mod checkstyle;
mod xunit;

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use roxmltree::{Document, Node, ParsingOptions};
use time::{OffsetDateTime, UtcOffset};

use crate::core::{Report, ReportKind};

/// Read and parse the report at `path`.
///
/// `workspace` is only used by lint reports, whose file paths have it
/// stripped when it is a prefix.
pub fn load(path: &Path, workspace: Option<&str>) -> Result<Report> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report: {}", path.display()))
        .map_err(crate::exit::malformed_report_err)?;
    let modified_at = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| in_local_offset(OffsetDateTime::from(t)))
        .with_context(|| format!("failed to read modification time: {}", path.display()))
        .map_err(crate::exit::malformed_report_err)?;
    parse_str(&text, modified_at, workspace)
        .with_context(|| format!("report: {}", path.display()))
}

/// Shift `at` into the machine's local offset, keeping UTC when the offset
/// cannot be determined.
fn in_local_offset(at: OffsetDateTime) -> OffsetDateTime {
    match UtcOffset::current_local_offset() {
        Ok(offset) => at.to_offset(offset),
        Err(_) => at,
    }
}

pub fn parse_str(
    xml: &str,
    modified_at: OffsetDateTime,
    workspace: Option<&str>,
) -> Result<Report> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, opts)
        .map_err(|e| crate::exit::malformed_report(format!("invalid XML: {e}")))?;
    let root = doc.root_element();
    let tag = root.tag_name().name();
    match ReportKind::from_root_tag(tag) {
        Some(ReportKind::Test) => xunit::parse(root).map(Report::Test),
        Some(ReportKind::Lint) => {
            checkstyle::parse(root, modified_at, workspace).map(Report::Lint)
        }
        None => Err(crate::exit::unsupported_report(tag)),
    }
}

fn parse_attr<T: FromStr>(node: Node<'_, '_>, name: &str) -> Result<Option<T>> {
    node.attribute(name)
        .map(|raw| parse_number(node, name, raw))
        .transpose()
}

fn parse_required_attr<T: FromStr>(node: Node<'_, '_>, name: &str) -> Result<T> {
    let raw = require_attr(node, name)?;
    parse_number(node, name, raw)
}

fn parse_number<T: FromStr>(node: Node<'_, '_>, name: &str, raw: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        crate::exit::malformed_report(format!(
            "<{}> attribute `{name}` is not a number: {raw:?}",
            node.tag_name().name()
        ))
    })
}

fn require_attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        crate::exit::malformed_report(format!(
            "<{}> is missing required attribute `{name}`",
            node.tag_name().name()
        ))
    })
}
