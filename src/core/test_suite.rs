/// Counts and failing cases of one xUnit `testsuite`.
///
/// The totals come straight from the suite attributes, so skipped and passing
/// cases are counted there even though they never become entries.
#[derive(Debug, Clone, PartialEq)]
pub struct TestReport {
    pub tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    pub time: f64,
    pub timestamp: String,
    pub entries: Vec<TestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEntry {
    pub status: String,
    pub class_name: String,
    pub test_name: String,
    pub text: String,
}
