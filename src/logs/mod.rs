use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::{ChangeTarget, ReportKind};

#[derive(Debug, Serialize)]
struct PostLog<'a> {
    schema_version: &'static str,
    tool_version: &'static str,
    command: &'static str,
    started_at: String,
    finished_at: String,
    status: &'static str,
    target: &'a ChangeTarget,
    report_kind: ReportKind,
    clean_slate: bool,
    deleted_comment_ids: &'a [u64],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// What happened during one publish attempt.
#[derive(Debug)]
pub struct PostRecord<'a> {
    pub started_at: OffsetDateTime,
    pub finished_at: OffsetDateTime,
    pub target: &'a ChangeTarget,
    pub report_kind: ReportKind,
    pub clean_slate: bool,
    pub deleted_comment_ids: &'a [u64],
    pub error: Option<&'a anyhow::Error>,
}

/// Write `post-{pid}-{nanos}.json` into `dir` and return its path.
pub fn write_post_log(dir: &Path, record: &PostRecord<'_>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let pid = std::process::id();
    let ts = record.finished_at.unix_timestamp_nanos();
    let path = dir.join(format!("post-{pid}-{ts}.json"));

    let log = PostLog {
        schema_version: "1",
        tool_version: env!("CARGO_PKG_VERSION"),
        command: "post",
        started_at: format_rfc3339(record.started_at),
        finished_at: format_rfc3339(record.finished_at),
        status: if record.error.is_none() { "ok" } else { "error" },
        target: record.target,
        report_kind: record.report_kind,
        clean_slate: record.clean_slate,
        deleted_comment_ids: record.deleted_comment_ids,
        error: record.error.map(|e| format!("{e:#}")),
    };

    let json = serde_json::to_string_pretty(&log).context("failed to serialize run log")?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write run log: {}", path.display()))?;
    Ok(path)
}

fn format_rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}
