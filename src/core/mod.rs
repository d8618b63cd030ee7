mod change;
mod lint;
mod report;
mod tally;
mod test_suite;

pub use change::{ChangeKind, ChangeTarget, Credentials};
pub use lint::{LintError, LintFile, LintReport};
pub use report::{Report, ReportKind};
pub use tally::SeverityTally;
pub use test_suite::{TestEntry, TestReport};
