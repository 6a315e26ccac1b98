// src/config.rs
//
// Run configuration: TOML file with serde defaults, path overridable via
// env. Secrets (bot token, chat id, API key) never live here; the binary
// reads them from the environment.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "NEWSWATCH_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/newswatch.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// SQLite file holding the seen store.
    pub db_path: String,
    /// Recency window: items older than this many hours are skipped.
    pub max_age_hours: i64,
    /// Items per outbound message.
    pub batch_size: usize,
    /// Send the summary heartbeat even when no new items were found.
    pub heartbeat_on_empty: bool,
    /// UTC offset used for displayed timestamps, with its label.
    pub display_utc_offset_hours: i32,
    pub tz_label: String,
    /// Per-call HTTP timeout and bounded retry count for fetch/send.
    pub http_timeout_secs: u64,
    pub max_tries: u8,
    pub google_rss: GoogleRssConfig,
    pub newsapi: NewsApiConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            db_path: "seen.sqlite".to_string(),
            max_age_hours: 24,
            batch_size: 8,
            heartbeat_on_empty: true,
            display_utc_offset_hours: 0,
            tz_label: "UTC".to_string(),
            http_timeout_secs: 20,
            max_tries: 3,
            google_rss: GoogleRssConfig::default(),
            newsapi: NewsApiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleRssConfig {
    pub enabled: bool,
    pub query: String,
    pub limit: usize,
    /// Google News locale knobs (interface language, country, edition).
    pub hl: String,
    pub gl: String,
    pub ceid: String,
    /// Follow the Google redirector to the article's final URL.
    pub resolve_redirects: bool,
}

impl Default for GoogleRssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            query: "customs OR tariffs OR \"border enforcement\" when:24h".to_string(),
            limit: 30,
            hl: "en-US".to_string(),
            gl: "US".to_string(),
            ceid: "US:en".to_string(),
            resolve_redirects: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsApiConfig {
    pub query: String,
    pub limit: usize,
    pub language: Option<String>,
    /// Press-release mills excluded server-side.
    pub exclude_domains: Option<String>,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            query: "customs OR tariffs OR \"border enforcement\"".to_string(),
            limit: 20,
            language: Some("en".to_string()),
            exclude_domains: Some(
                "globenewswire.com,prnewswire.com,businesswire.com".to_string(),
            ),
        }
    }
}

pub fn load_from(path: &Path) -> Result<RunConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

/// Load order: $NEWSWATCH_CONFIG_PATH, then config/newswatch.toml, then
/// built-in defaults. A set env var pointing nowhere is an error, not a
/// silent fallback.
pub fn load_default() -> Result<RunConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("NEWSWATCH_CONFIG_PATH points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default.exists() {
        return load_from(&default);
    }
    Ok(RunConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: RunConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.max_age_hours, 24);
        assert_eq!(cfg.batch_size, 8);
        assert!(cfg.heartbeat_on_empty);
        assert!(cfg.google_rss.enabled);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let cfg: RunConfig = toml::from_str(
            r#"
            batch_size = 1
            max_age_hours = 6

            [google_rss]
            query = "steel quotas"
            resolve_redirects = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.batch_size, 1);
        assert_eq!(cfg.max_age_hours, 6);
        assert_eq!(cfg.google_rss.query, "steel quotas");
        assert!(!cfg.google_rss.resolve_redirects);
        // untouched section keeps defaults
        assert_eq!(cfg.newsapi.limit, 20);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<RunConfig>("no_such_knob = 1").is_err());
    }
}
