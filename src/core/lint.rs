use crate::core::SeverityTally;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct LintReport {
    /// Last-modified time of the report file, not anything inside it.
    pub modified_at: OffsetDateTime,
    pub tally: SeverityTally,
    pub files: Vec<LintFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFile {
    pub path: String,
    pub tally: SeverityTally,
    pub errors: Vec<LintError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintError {
    pub severity: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub message: String,
}
