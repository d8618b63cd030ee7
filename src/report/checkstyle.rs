use anyhow::Result;
use roxmltree::Node;
use time::OffsetDateTime;

use super::{parse_attr, require_attr};
use crate::core::{LintError, LintFile, LintReport, SeverityTally};

pub(super) fn parse(
    root: Node<'_, '_>,
    modified_at: OffsetDateTime,
    workspace: Option<&str>,
) -> Result<LintReport> {
    let mut tally = SeverityTally::new();
    let mut files = Vec::new();

    for file in root.children().filter(|n| n.has_tag_name("file")) {
        let name = require_attr(file, "name")?;
        let mut file_tally = SeverityTally::new();
        let mut errors = Vec::new();

        for error in file.children().filter(|n| n.has_tag_name("error")) {
            let severity = require_attr(error, "severity")?;
            file_tally.add(severity);
            tally.add(severity);
            errors.push(LintError {
                severity: severity.to_string(),
                line: parse_attr(error, "line")?,
                column: parse_attr(error, "column")?,
                message: error.attribute("message").unwrap_or("").to_string(),
            });
        }

        files.push(LintFile {
            path: strip_workspace(name, workspace).to_string(),
            tally: file_tally,
            errors,
        });
    }

    Ok(LintReport {
        modified_at,
        tally,
        files,
    })
}

/// Drop `workspace` from the front of `path` when it is a prefix; otherwise
/// return `path` untouched.
pub(super) fn strip_workspace<'a>(path: &'a str, workspace: Option<&str>) -> &'a str {
    workspace
        .and_then(|ws| path.strip_prefix(ws))
        .unwrap_or(path)
}
