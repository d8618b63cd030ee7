use anyhow::Error;
use indicatif::{ProgressBar, ProgressDrawTarget};
use std::io::{self, Write};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct UiConfig {
    pub stderr_is_tty: bool,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }
}

/// `clap`-style usage line followed by the error, for reports we cannot
/// handle at all.
pub fn eprintln_usage_error(usage: &str, err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", usage.trim_end());
    let _ = writeln!(stderr, "{}: error: {err:#}", env!("CARGO_PKG_NAME"));
}

/// Progress line on stderr, only when `--verbose` is set.
pub fn note(cfg: &UiConfig, msg: impl AsRef<str>) {
    if cfg.verbose {
        eprintln!("{}", msg.as_ref());
    }
}

pub fn print_posted(cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    println!("Comment posted.");
}

/// Write the rendered comment to stdout instead of posting it.
pub fn print_dry_run(body: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match writeln!(stdout, "{body}") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Spinner for the remote calls; `None` when stderr is not a terminal or
/// output is quiet/verbose.
pub fn spinner(cfg: &UiConfig, msg: &str) -> Option<ProgressBar> {
    if !cfg.stderr_is_tty || cfg.quiet || cfg.verbose {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}
