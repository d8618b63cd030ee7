use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bitbucket::{ApiUrls, DEFAULT_API_V1_URL, DEFAULT_API_V2_URL};

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub api: ApiConfig,
    pub comments: CommentsConfig,
    pub logs: LogsConfig,
    pub config_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub v1_url: String,
    pub v2_url: String,
}

impl ApiConfig {
    pub fn urls(&self) -> ApiUrls {
        ApiUrls {
            v1: self.v1_url.clone(),
            v2: self.v2_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentsConfig {
    /// Clean-slate mode: drop our earlier comments on the change before posting.
    pub delete_previous: bool,
}

#[derive(Debug, Clone)]
pub struct LogsConfig {
    pub dir: Option<PathBuf>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                v1_url: DEFAULT_API_V1_URL.to_string(),
                v2_url: DEFAULT_API_V2_URL.to_string(),
            },
            comments: CommentsConfig {
                delete_previous: false,
            },
            logs: LogsConfig { dir: None },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    api: Option<RawApiConfig>,
    comments: Option<RawCommentsConfig>,
    logs: Option<RawLogsConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApiConfig {
    v1_url: Option<String>,
    v2_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCommentsConfig {
    delete_previous: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLogsConfig {
    dir: Option<PathBuf>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/bucketnote/config.toml")
}

/// Defaults, then the TOML file (explicit path, or the default one under
/// `home_dir` when it exists), then `BUCKETNOTE_*` environment variables.
pub fn load(config_path: Option<&Path>, home_dir: Option<&Path>) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = match config_path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("config file not found: {}", p.display());
            }
            Some(p.to_owned())
        }
        None => home_dir.map(default_config_path).filter(|p| p.exists()),
    };

    if let Some(path) = path {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw = parse_raw(&s)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn parse_raw(s: &str) -> Result<RawConfig> {
    toml::from_str(s).context("invalid TOML")
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(api) = raw.api {
        if let Some(v1_url) = api.v1_url {
            cfg.api.v1_url = v1_url;
        }
        if let Some(v2_url) = api.v2_url {
            cfg.api.v2_url = v2_url;
        }
    }

    if let Some(comments) = raw.comments {
        if let Some(delete_previous) = comments.delete_previous {
            cfg.comments.delete_previous = delete_previous;
        }
    }

    if let Some(logs) = raw.logs {
        if logs.dir.is_some() {
            cfg.logs.dir = logs.dir;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Some(v) = non_empty_env("BUCKETNOTE_API_V1_URL") {
        cfg.api.v1_url = v;
    }
    if let Some(v) = non_empty_env("BUCKETNOTE_API_V2_URL") {
        cfg.api.v2_url = v;
    }
    if let Ok(v) = std::env::var("BUCKETNOTE_DELETE_PREVIOUS") {
        cfg.comments.delete_previous =
            parse_bool(&v).with_context(|| "BUCKETNOTE_DELETE_PREVIOUS")?;
    }
    if let Some(v) = non_empty_env("BUCKETNOTE_LOG_DIR") {
        cfg.logs.dir = Some(PathBuf::from(v));
    }

    Ok(())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_overrides_defaults() {
        let raw = parse_raw(
            r#"
[api]
v1_url = "http://localhost:9000/1.0"

[comments]
delete_previous = true

[logs]
dir = "/tmp/bucketnote-logs"
"#,
        )
        .expect("parse");
        let mut cfg = EffectiveConfig::default();
        apply_raw_config(&mut cfg, raw);
        assert_eq!(cfg.api.v1_url, "http://localhost:9000/1.0");
        assert_eq!(cfg.api.v2_url, DEFAULT_API_V2_URL);
        assert!(cfg.comments.delete_previous);
        assert_eq!(cfg.logs.dir, Some(PathBuf::from("/tmp/bucketnote-logs")));
    }

    #[test]
    fn delete_previous_defaults_to_off() {
        let cfg = EffectiveConfig::default();
        assert!(!cfg.comments.delete_previous);
        assert!(cfg.logs.dir.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_raw("[comments]\ndelete = true\n").is_err());
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for s in ["1", "true", "YES", " on "] {
            assert!(parse_bool(s).expect(s));
        }
        for s in ["0", "false", "No", "off"] {
            assert!(!parse_bool(s).expect(s));
        }
        assert!(parse_bool("maybe").is_err());
    }
}
