use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, CommandFactory, Parser};
use time::OffsetDateTime;

use crate::bitbucket::{ApiUrls, CommentClient};
use crate::config::EffectiveConfig;
use crate::core::{ChangeKind, ChangeTarget, Credentials};
use crate::exit::ExitCode;
use crate::render::RenderContext;
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "bucketnote",
    version,
    about = "Submit a well formatted Markdown comment to Bitbucket from a xunit.xml or lint.xml file"
)]
#[command(group(
    ArgGroup::new("change")
        .required(true)
        .args(["pullrequest", "commit"])
))]
pub struct Cli {
    /// The XML report to use.
    pub report: PathBuf,

    /// The name of the test to use in the comment.
    #[arg(short, long)]
    pub test: String,

    /// The Bitbucket user name.
    #[arg(short, long)]
    pub username: String,
    /// The Bitbucket user password.
    #[arg(short, long)]
    pub password: String,

    /// The Bitbucket repository account name.
    #[arg(short, long)]
    pub accountname: String,
    /// The Bitbucket repository slug.
    #[arg(short, long)]
    pub reposlug: String,
    /// The build number, shown on test report comments.
    #[arg(short, long)]
    pub build: Option<u64>,

    /// The change is a pull request.
    #[arg(long)]
    pub pullrequest: bool,
    /// The change is a commit.
    #[arg(long)]
    pub commit: bool,

    /// The pull request id or commit hash.
    #[arg(short = 'i', long)]
    pub changeid: String,

    /// Delete our previous comments on the change before posting.
    #[arg(short, long)]
    pub delete: bool,

    /// Path prefix stripped from file names in lint reports.
    #[arg(short, long)]
    pub workspace: Option<String>,

    /// Print the rendered comment instead of posting it.
    #[arg(long)]
    pub dry_run: bool,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory for JSON run logs.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
    #[arg(long)]
    pub verbose: bool,
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Everything one run needs, resolved from arguments and configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub report_path: PathBuf,
    pub render: RenderContext,
    pub credentials: Credentials,
    pub target: ChangeTarget,
    pub delete_previous: bool,
    pub workspace: Option<String>,
    pub dry_run: bool,
    pub api: ApiUrls,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Command-line values win over `cfg`.
    pub fn resolve(cli: Cli, cfg: &EffectiveConfig) -> Self {
        let kind = if cli.commit {
            ChangeKind::Commit
        } else {
            ChangeKind::PullRequest
        };
        Self {
            report_path: cli.report,
            render: RenderContext {
                test_name: cli.test,
                build: cli.build,
            },
            credentials: Credentials {
                username: cli.username,
                password: cli.password,
            },
            target: ChangeTarget {
                account: cli.accountname,
                repo_slug: cli.reposlug,
                kind,
                change_id: cli.changeid,
            },
            delete_previous: cli.delete || cfg.comments.delete_previous,
            workspace: cli.workspace,
            dry_run: cli.dry_run,
            api: cfg.api.urls(),
            log_dir: cli.log_dir.or_else(|| cfg.logs.dir.clone()),
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let ui = UiConfig {
        stderr_is_tty: io::stderr().is_terminal(),
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let home_dir = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from);
    let env_config_path = std::env::var_os("BUCKETNOTE_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        home_dir.as_deref(),
    )
    .map_err(crate::exit::invalid_args_err)?;
    if let Some(path) = &cfg.config_path {
        crate::ui::note(&ui, format!("config: {path}"));
    }

    let settings = Settings::resolve(cli, &cfg);
    execute(&settings, &ui)
}

/// Load, render and publish one report.
pub fn execute(settings: &Settings, ui: &UiConfig) -> Result<()> {
    let report = crate::report::load(&settings.report_path, settings.workspace.as_deref())?;
    crate::ui::note(
        ui,
        format!(
            "report: {} ({})",
            settings.report_path.display(),
            report.kind()
        ),
    );
    let body = crate::render::render(&report, &settings.render);

    if settings.dry_run {
        return crate::ui::print_dry_run(&body);
    }

    let client = CommentClient::new(
        settings.api.clone(),
        settings.credentials.clone(),
        settings.target.clone(),
    )?
    .with_ui(ui.clone());

    let started_at = OffsetDateTime::now_utc();
    let pb = crate::ui::spinner(ui, &format!("posting comment on {}", settings.target));
    let mut deleted = Vec::new();
    let result = publish(&client, &body, settings.delete_previous, &mut deleted);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let finished_at = OffsetDateTime::now_utc();

    if let Some(dir) = &settings.log_dir {
        let record = crate::logs::PostRecord {
            started_at,
            finished_at,
            target: &settings.target,
            report_kind: report.kind(),
            clean_slate: settings.delete_previous,
            deleted_comment_ids: &deleted,
            error: result.as_ref().err(),
        };
        match crate::logs::write_post_log(dir, &record) {
            Ok(path) => crate::ui::note(ui, format!("log: {}", path.display())),
            Err(err) => eprintln!("warning: {err:#}"),
        }
    }

    result?;
    if settings.delete_previous {
        crate::ui::note(
            ui,
            format!("deleted {} previous comment(s) {:?}", deleted.len(), deleted),
        );
    }
    crate::ui::print_posted(ui);
    Ok(())
}

/// Clean slate (when asked) then post. `deleted` is filled before the post
/// is attempted so a failed post still reports what was removed.
fn publish(
    client: &CommentClient,
    body: &str,
    clean_slate: bool,
    deleted: &mut Vec<u64>,
) -> Result<()> {
    if clean_slate {
        *deleted = client.delete_own_comments()?;
    }
    client.post_comment(body)
}

/// Print `err` for the user. Unknown report types get the usage line too.
pub fn print_error(err: &anyhow::Error) {
    if crate::exit::code_of(err) == Some(ExitCode::UnsupportedReport) {
        let usage = Cli::command().render_usage().to_string();
        crate::ui::eprintln_usage_error(&usage, err);
    } else {
        crate::ui::eprintln_error(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: &[&str] = &[
        "bucketnote",
        "report.xml",
        "--test",
        "unit",
        "-u",
        "bot",
        "-p",
        "pw",
        "-a",
        "acme",
        "-r",
        "widgets",
        "-i",
        "42",
    ];

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(REQUIRED.iter().chain(extra.iter()))
    }

    #[test]
    fn change_kind_is_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn pullrequest_and_commit_are_exclusive() {
        assert!(parse(&["--pullrequest", "--commit"]).is_err());
    }

    #[test]
    fn resolve_maps_arguments() {
        let cli = parse(&["--commit", "-b", "12", "-w", "/ws/"]).expect("parse");
        let settings = Settings::resolve(cli, &EffectiveConfig::default());
        assert_eq!(settings.report_path, PathBuf::from("report.xml"));
        assert_eq!(settings.target.kind, ChangeKind::Commit);
        assert_eq!(settings.target.account, "acme");
        assert_eq!(settings.target.repo_slug, "widgets");
        assert_eq!(settings.target.change_id, "42");
        assert_eq!(settings.render.test_name, "unit");
        assert_eq!(settings.render.build, Some(12));
        assert_eq!(settings.workspace.as_deref(), Some("/ws/"));
        assert_eq!(settings.credentials.username, "bot");
        assert!(!settings.delete_previous);
        assert!(!settings.dry_run);
    }

    #[test]
    fn build_is_optional() {
        let cli = parse(&["--pullrequest"]).expect("parse");
        let settings = Settings::resolve(cli, &EffectiveConfig::default());
        assert_eq!(settings.render.build, None);
        assert_eq!(settings.target.kind, ChangeKind::PullRequest);
    }

    #[test]
    fn delete_comes_from_flag_or_config() {
        let mut cfg = EffectiveConfig::default();
        let cli = parse(&["--pullrequest", "--delete"]).expect("parse");
        assert!(Settings::resolve(cli, &cfg).delete_previous);

        cfg.comments.delete_previous = true;
        let cli = parse(&["--pullrequest"]).expect("parse");
        assert!(Settings::resolve(cli, &cfg).delete_previous);
    }

    #[test]
    fn log_dir_flag_overrides_config() {
        let mut cfg = EffectiveConfig::default();
        cfg.logs.dir = Some(PathBuf::from("/from/config"));
        let cli = parse(&["--pullrequest", "--log-dir", "/from/cli"]).expect("parse");
        assert_eq!(
            Settings::resolve(cli, &cfg).log_dir,
            Some(PathBuf::from("/from/cli"))
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
