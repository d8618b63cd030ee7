use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

use mockito::{Matcher, Server};

const PR_COMMENTS: &str = "/1.0/repositories/acme/widgets/pullrequests/17/comments";

fn bucketnote_cmd(home: &Path, server_url: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bucketnote"));
    cmd.env("HOME", home);
    cmd.env_remove("BUCKETNOTE_CONFIG");
    cmd.env_remove("BUCKETNOTE_DELETE_PREVIOUS");
    cmd.env_remove("BUCKETNOTE_LOG_DIR");
    cmd.env("BUCKETNOTE_API_V1_URL", format!("{server_url}/1.0"));
    cmd.env("BUCKETNOTE_API_V2_URL", format!("{server_url}/2.0"));
    cmd
}

fn run(home: &Path, server_url: &str, report: &Path, extra: &[&str]) -> Output {
    bucketnote_cmd(home, server_url)
        .arg(report)
        .args([
            "--test", "unit", "-u", "ci-bot", "-p", "pw", "-a", "acme", "-r", "widgets", "-i",
            "17", "--pullrequest",
        ])
        .args(extra)
        .output()
        .expect("run bucketnote")
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let home =
        std::env::temp_dir().join(format!("bucketnote-clean-test-{}-{seq}", std::process::id()));
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

fn write_report(home: &Path) -> PathBuf {
    let report = home.join("xunit.xml");
    std::fs::write(&report, r#"<testsuite tests="1"/>"#).expect("write report");
    report
}

const PRIOR_COMMENTS: &str = r#"[
  {"comment_id": 101, "username": "ci-bot", "deleted": false, "content": "old run 1"},
  {"comment_id": 102, "username": "ci-bot", "deleted": true, "content": "already gone"},
  {"comment_id": 103, "username": "reviewer", "deleted": false, "content": "please fix"},
  {"comment_id": 104, "username": "ci-bot", "deleted": false, "content": "old run 2"}
]"#;

#[test]
fn delete_removes_only_own_live_comments_then_posts() {
    let home = make_temp_home();
    let report = write_report(&home);

    let mut server = Server::new();
    let user = server
        .mock("GET", "/2.0/user")
        .with_status(200)
        .with_body(r#"{"username": "ci-bot"}"#)
        .expect(1)
        .create();
    let list = server
        .mock("GET", PR_COMMENTS)
        .with_status(200)
        .with_body(PRIOR_COMMENTS)
        .expect(1)
        .create();
    let own = server
        .mock(
            "DELETE",
            Matcher::Regex(format!("^{PR_COMMENTS}/(101|104)$")),
        )
        .with_status(200)
        .expect(2)
        .create();
    let others = server
        .mock(
            "DELETE",
            Matcher::Regex(format!("^{PR_COMMENTS}/(102|103)$")),
        )
        .expect(0)
        .create();
    let post = server
        .mock("POST", PR_COMMENTS)
        .with_status(200)
        .expect(1)
        .create();

    let out = run(&home, &server.url(), &report, &["--delete"]);
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    user.assert();
    list.assert();
    own.assert();
    others.assert();
    post.assert();

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn without_delete_nothing_is_listed_or_removed() {
    let home = make_temp_home();
    let report = write_report(&home);

    let mut server = Server::new();
    let gets = server.mock("GET", Matcher::Any).expect(0).create();
    let deletes = server.mock("DELETE", Matcher::Any).expect(0).create();
    let post = server
        .mock("POST", PR_COMMENTS)
        .with_status(200)
        .expect(1)
        .create();

    let out = run(&home, &server.url(), &report, &[]);
    assert!(out.status.success());
    gets.assert();
    deletes.assert();
    post.assert();

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn failed_delete_aborts_before_posting() {
    let home = make_temp_home();
    let report = write_report(&home);

    let mut server = Server::new();
    let _user = server
        .mock("GET", "/2.0/user")
        .with_body(r#"{"username": "ci-bot"}"#)
        .create();
    let _list = server
        .mock("GET", PR_COMMENTS)
        .with_body(PRIOR_COMMENTS)
        .create();
    let _delete = server
        .mock("DELETE", Matcher::Regex(format!("^{PR_COMMENTS}/101$")))
        .with_status(404)
        .create();
    let post = server.mock("POST", PR_COMMENTS).expect(0).create();

    let out = run(&home, &server.url(), &report, &["--delete"]);
    assert_eq!(out.status.code(), Some(20));
    post.assert();

    let _ = std::fs::remove_dir_all(&home);
}
