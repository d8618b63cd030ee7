//! Bitbucket comment endpoints.
//!
//! Comments live under the 1.0 API (`…/{pullrequests|changesets}/{id}/comments`);
//! the authenticated user's name comes from the 2.0 `user` endpoint.
//! Every call is blocking and any non-2xx answer aborts the run.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::core::{ChangeTarget, Credentials};
use crate::ui::UiConfig;

pub const DEFAULT_API_V1_URL: &str = "https://api.bitbucket.org/1.0";
pub const DEFAULT_API_V2_URL: &str = "https://api.bitbucket.org/2.0";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    pub comment_id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct User {
    username: String,
}

#[derive(Debug, Clone)]
pub struct ApiUrls {
    pub v1: String,
    pub v2: String,
}

pub struct CommentClient {
    http: Client,
    urls: ApiUrls,
    credentials: Credentials,
    target: ChangeTarget,
    ui: UiConfig,
}

impl CommentClient {
    pub fn new(urls: ApiUrls, credentials: Credentials, target: ChangeTarget) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("failed to build HTTP client")
            .map_err(crate::exit::remote_api_err)?;
        Ok(Self {
            http,
            urls,
            credentials,
            target,
            ui: UiConfig::default(),
        })
    }

    /// Request lines are echoed through `ui` when it is verbose.
    pub fn with_ui(mut self, ui: UiConfig) -> Self {
        self.ui = ui;
        self
    }

    pub fn comments_url(&self) -> String {
        format!(
            "{}/repositories/{}/{}/{}/{}/comments",
            self.urls.v1.trim_end_matches('/'),
            self.target.account,
            self.target.repo_slug,
            self.target.kind.path_segment(),
            self.target.change_id
        )
    }

    fn comment_url(&self, id: u64) -> String {
        format!("{}/{id}", self.comments_url())
    }

    fn user_url(&self) -> String {
        format!("{}/user", self.urls.v2.trim_end_matches('/'))
    }

    /// Name of the account the credentials belong to.
    pub fn current_username(&self) -> Result<String> {
        let url = self.user_url();
        let resp = self.send("GET", &url, self.http.get(&url))?;
        let user: User = resp
            .json()
            .with_context(|| format!("unexpected response body from GET {url}"))
            .map_err(crate::exit::remote_api_err)?;
        Ok(user.username)
    }

    /// All comments on the change, soft-deleted ones included.
    pub fn list_comments(&self) -> Result<Vec<Comment>> {
        let url = self.comments_url();
        let resp = self.send("GET", &url, self.http.get(&url))?;
        resp.json()
            .with_context(|| format!("unexpected response body from GET {url}"))
            .map_err(crate::exit::remote_api_err)
    }

    pub fn delete_comment(&self, id: u64) -> Result<()> {
        let url = self.comment_url(id);
        self.send("DELETE", &url, self.http.delete(&url))?;
        Ok(())
    }

    pub fn post_comment(&self, content: &str) -> Result<()> {
        let url = self.comments_url();
        self.send(
            "POST",
            &url,
            self.http.post(&url).form(&[("content", content)]),
        )?;
        Ok(())
    }

    /// Delete every live comment written by the authenticated user and return
    /// the removed ids in listing order.
    ///
    /// Another writer may post between the listing and the deletes; such a
    /// comment survives.
    pub fn delete_own_comments(&self) -> Result<Vec<u64>> {
        let me = self.current_username()?;
        let mine: Vec<u64> = self
            .list_comments()?
            .into_iter()
            .filter(|c| !c.deleted && c.username.as_deref() == Some(me.as_str()))
            .map(|c| c.comment_id)
            .collect();
        for id in &mine {
            self.delete_comment(*id)?;
        }
        Ok(mine)
    }

    fn send(&self, method: &str, url: &str, req: RequestBuilder) -> Result<Response> {
        crate::ui::note(&self.ui, format!("{method} {url}"));
        let resp = req
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .with_context(|| format!("{method} {url} failed"))
            .map_err(crate::exit::remote_api_err)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let body = body.trim();
            let mut msg = format!("{method} {url} returned {status}");
            if !body.is_empty() {
                msg.push('\n');
                msg.push_str(truncate(body, 512));
            }
            return Err(crate::exit::remote_api(msg));
        }
        Ok(resp)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
