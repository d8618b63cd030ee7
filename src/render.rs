//! Markdown comment bodies for test and lint reports.
//!
//! Output targets Bitbucket's Markdown renderer, so nothing is HTML-escaped
//! and failure text goes into fenced blocks verbatim.

use std::fmt::Write as _;

use time::OffsetDateTime;
use time::macros::format_description;

use crate::core::{LintError, LintFile, LintReport, Report, TestEntry, TestReport};

/// Caller-supplied values that appear in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub test_name: String,
    pub build: Option<u64>,
}

pub fn render(report: &Report, ctx: &RenderContext) -> String {
    match report {
        Report::Test(r) => render_test_report(r, ctx),
        Report::Lint(r) => render_lint_report(r, ctx),
    }
}

pub fn render_test_report(report: &TestReport, ctx: &RenderContext) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# Failed on {}: {} failure(s), {} error(s) and {} skipped for {} tests #",
        ctx.test_name, report.failures, report.errors, report.skipped, report.tests
    );
    let _ = write!(
        out,
        "*Build{} on {}*",
        build_suffix(ctx.build),
        report.timestamp
    );
    out.push_str("\n\n");

    let entries: Vec<String> = report.entries.iter().map(test_entry).collect();
    out.push_str(&entries.join("\n\n"));
    out
}

fn test_entry(entry: &TestEntry) -> String {
    format!(
        "* **{}** {} / {}\n```node\n{}\n```",
        capitalize(&entry.status),
        entry.class_name,
        entry.test_name,
        entry.text
    )
}

/// The build number is never shown on lint comments.
pub fn render_lint_report(report: &LintReport, ctx: &RenderContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Failed on {}: {}#", ctx.test_name, report.tally);
    let _ = write!(out, "*Build on {}*", format_timestamp(report.modified_at));
    out.push_str("\n\n");

    let files: Vec<String> = report.files.iter().map(lint_file).collect();
    out.push_str(&files.join("\n\n"));
    out
}

fn lint_file(file: &LintFile) -> String {
    let errors: Vec<String> = file.errors.iter().map(lint_error).collect();
    format!(
        "* **{}**: {}\n{}\n",
        file.path,
        file.tally,
        errors.join("\n\n")
    )
}

fn lint_error(error: &LintError) -> String {
    format!(
        "    * **{}** on line {}, column {}\n```\n{}\n```",
        capitalize(&error.severity),
        position(error.line),
        position(error.column),
        error.message
    )
}

fn position(value: Option<u32>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

fn build_suffix(build: Option<u64>) -> String {
    build.map(|b| format!(" {b}")).unwrap_or_default()
}

/// `Thu Oct 16 09:30:00 2026`, in whatever offset `at` carries.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let fmt = format_description!(
        "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year]"
    );
    at.format(fmt).unwrap_or_else(|_| "unknown".to_string())
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
