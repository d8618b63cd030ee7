use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    InvalidArgs,
    UnsupportedReport,
    MalformedReport,
    RemoteApi,
}

impl ExitCode {
    pub const fn as_i32(self) -> i32 {
        match self {
            ExitCode::InvalidArgs | ExitCode::UnsupportedReport => 2,
            ExitCode::MalformedReport => 10,
            ExitCode::RemoteApi => 20,
        }
    }
}

#[derive(Debug)]
pub struct ExitError {
    pub code: ExitCode,
    pub err: anyhow::Error,
}

impl ExitError {
    pub fn new(code: ExitCode, err: anyhow::Error) -> Self {
        Self { code, err }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.err.fmt(f)
    }
}

impl std::error::Error for ExitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.err.source()
    }
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(exit) = err.downcast_ref::<ExitError>() {
        return exit.code.as_i32();
    }
    ExitCode::MalformedReport.as_i32()
}

pub fn code_of(err: &anyhow::Error) -> Option<ExitCode> {
    err.downcast_ref::<ExitError>().map(|e| e.code)
}

pub fn invalid_args_err(err: anyhow::Error) -> anyhow::Error {
    ExitError::new(ExitCode::InvalidArgs, err).into()
}

/// Root element is neither `testsuite` nor `checkstyle`.
pub fn unsupported_report(tag: &str) -> anyhow::Error {
    ExitError::new(
        ExitCode::UnsupportedReport,
        anyhow::anyhow!("Unknown XML type (tag = {tag})"),
    )
    .into()
}

pub fn malformed_report(message: impl Into<String>) -> anyhow::Error {
    ExitError::new(ExitCode::MalformedReport, anyhow::anyhow!(message.into())).into()
}

pub fn malformed_report_err(err: anyhow::Error) -> anyhow::Error {
    ExitError::new(ExitCode::MalformedReport, err).into()
}

pub fn remote_api(message: impl Into<String>) -> anyhow::Error {
    ExitError::new(ExitCode::RemoteApi, anyhow::anyhow!(message.into())).into()
}

pub fn remote_api_err(err: anyhow::Error) -> anyhow::Error {
    ExitError::new(ExitCode::RemoteApi, err).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn classified_errors_map_to_their_codes() {
        assert_eq!(exit_code(&invalid_args_err(anyhow::anyhow!("x"))), 2);
        assert_eq!(exit_code(&unsupported_report("foo")), 2);
        assert_eq!(exit_code(&malformed_report("x")), 10);
        assert_eq!(exit_code(&remote_api("x")), 20);
    }

    #[test]
    fn unclassified_errors_fall_back_to_report_failure() {
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 10);
    }

    #[test]
    fn context_keeps_the_exit_code() {
        let err: anyhow::Result<()> = Err(remote_api("503"));
        let err = err.context("POST comment").unwrap_err();
        assert_eq!(exit_code(&err), 20);
    }

    #[test]
    fn chain_shows_each_message_once() {
        let err: anyhow::Result<()> = Err(malformed_report("missing `tests`"));
        let err = err.context("report: a.xml").unwrap_err();
        let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert_eq!(chain, vec!["report: a.xml", "missing `tests`"]);
        assert_eq!(format!("{err:#}"), "report: a.xml: missing `tests`");
    }

    #[test]
    fn unsupported_report_is_told_apart_from_bad_args() {
        assert_eq!(
            code_of(&unsupported_report("foo")),
            Some(ExitCode::UnsupportedReport)
        );
        assert_eq!(
            code_of(&invalid_args_err(anyhow::anyhow!("bad flag"))),
            Some(ExitCode::InvalidArgs)
        );
        assert_eq!(code_of(&anyhow::anyhow!("plain")), None);
    }
}
