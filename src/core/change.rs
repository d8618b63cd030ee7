use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    PullRequest,
    Commit,
}

impl ChangeKind {
    /// Path segment used by the comments endpoint.
    pub const fn path_segment(self) -> &'static str {
        match self {
            ChangeKind::PullRequest => "pullrequests",
            ChangeKind::Commit => "changesets",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::PullRequest => f.write_str("pull request"),
            ChangeKind::Commit => f.write_str("commit"),
        }
    }
}

/// The pull request or commit a comment is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeTarget {
    pub account: String,
    pub repo_slug: String,
    pub kind: ChangeKind,
    pub change_id: String,
}

impl fmt::Display for ChangeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {} {}",
            self.account, self.repo_slug, self.kind, self.change_id
        )
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
