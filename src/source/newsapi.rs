// src/source/newsapi.rs
//
// NewsAPI `/v2/everything` adapter. The API key comes from the environment;
// without one the adapter is simply not constructed and the run is RSS-only.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::NewsApiConfig;
use crate::normalize::normalize_url;
use crate::source::{http, CandidateItem, SourceAdapter};

const ENDPOINT: &str = "https://newsapi.org/v2/everything";
const ENV_API_KEY: &str = "NEWSAPI_KEY";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    source: ArticleSource,
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

fn parse_rfc3339_utc(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a response body. A non-ok envelope is a parse error for this source
/// only; the coordinator drops the source and the run continues.
pub fn parse_response_str(body: &str) -> Result<Vec<CandidateItem>> {
    let env: Envelope = serde_json::from_str(body).context("parsing newsapi json")?;
    if env.status != "ok" {
        bail!(
            "newsapi error status {:?}: {}",
            env.status,
            env.message.unwrap_or_default()
        );
    }

    let mut out = Vec::with_capacity(env.articles.len());
    for a in env.articles {
        let name = a.source.name.unwrap_or_default();
        out.push(CandidateItem {
            source: format!("NewsAPI:{name}").trim_end_matches(':').to_string(),
            title: a.title.unwrap_or_default().trim().to_string(),
            url: normalize_url(&a.url.unwrap_or_default()),
            published_at: a.published_at.as_deref().and_then(parse_rfc3339_utc),
        });
    }
    Ok(out)
}

pub struct NewsApiAdapter {
    client: Client,
    api_key: String,
    language: Option<String>,
    exclude_domains: Option<String>,
    from: DateTime<Utc>,
    max_tries: u8,
}

impl NewsApiAdapter {
    pub fn new(client: Client, api_key: String, cfg: &NewsApiConfig, from: DateTime<Utc>, max_tries: u8) -> Self {
        Self {
            client,
            api_key,
            language: cfg.language.clone(),
            exclude_domains: cfg.exclude_domains.clone(),
            from,
            max_tries,
        }
    }

    /// None when NEWSAPI_KEY is unset or blank.
    pub fn from_env(client: Client, cfg: &NewsApiConfig, from: DateTime<Utc>, max_tries: u8) -> Option<Self> {
        let key = std::env::var(ENV_API_KEY).ok()?;
        if key.trim().is_empty() {
            return None;
        }
        Some(Self::new(client, key, cfg, from, max_tries))
    }

    fn request_url(&self, query: &str, limit: usize) -> Result<Url> {
        let limit = limit.to_string();
        let from = self.from.to_rfc3339();
        let mut params: Vec<(&str, &str)> = vec![
            ("q", query),
            ("searchIn", "title,description"),
            ("sortBy", "publishedAt"),
            ("pageSize", &limit),
            ("from", &from),
            ("apiKey", &self.api_key),
        ];
        if let Some(lang) = &self.language {
            params.push(("language", lang));
        }
        if let Some(excl) = &self.exclude_domains {
            params.push(("excludeDomains", excl));
        }
        Url::parse_with_params(ENDPOINT, params).context("building newsapi url")
    }
}

#[async_trait]
impl SourceAdapter for NewsApiAdapter {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<CandidateItem>> {
        let url = self.request_url(query, limit)?;
        let resp = http::get_with_retry(&self.client, url.as_str(), self.max_tries).await?;
        let body = resp.text().await.context("newsapi body")?;
        parse_response_str(&body)
    }

    fn name(&self) -> &'static str {
        "NewsAPI"
    }
}
