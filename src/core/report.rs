use crate::core::{LintReport, TestReport};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Test(TestReport),
    Lint(LintReport),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Test(_) => ReportKind::Test,
            Report::Lint(_) => ReportKind::Lint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Test,
    Lint,
}

impl ReportKind {
    /// Root element name that identifies this kind of report.
    pub const fn root_tag(self) -> &'static str {
        match self {
            ReportKind::Test => "testsuite",
            ReportKind::Lint => "checkstyle",
        }
    }

    pub fn from_root_tag(tag: &str) -> Option<Self> {
        [ReportKind::Test, ReportKind::Lint]
            .into_iter()
            .find(|kind| kind.root_tag() == tag)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Test => f.write_str("test"),
            ReportKind::Lint => f.write_str("lint"),
        }
    }
}
