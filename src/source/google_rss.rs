// src/source/google_rss.rs
//
// Google News search RSS. Entry links point at a Google redirector, so each
// link is resolved to its final URL best-effort before it reaches the merger.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use reqwest::Client;
use serde::Deserialize;

use crate::config::GoogleRssConfig;
use crate::source::{http, CandidateItem, SourceAdapter};

const SOURCE_TAG: &str = "GoogleNews";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

fn parse_rfc2822_utc(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a feed body into candidates, newest-to-oldest as delivered by the
/// feed, truncated to `limit`. Public so tests can drive it from fixtures.
pub fn parse_feed_str(body: &str, limit: usize) -> Result<Vec<CandidateItem>> {
    let xml_clean = scrub_html_entities_for_xml(body);
    let rss: Rss = from_str(&xml_clean).context("parsing google news rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.item.len().min(limit));
    for it in rss.channel.item.into_iter().take(limit) {
        let title = html_escape::decode_html_entities(it.title.as_deref().unwrap_or_default())
            .trim()
            .to_string();
        out.push(CandidateItem {
            source: SOURCE_TAG.to_string(),
            title,
            url: it.link.unwrap_or_default(),
            published_at: it.pub_date.as_deref().and_then(parse_rfc2822_utc),
        });
    }
    Ok(out)
}

pub struct GoogleRssAdapter {
    client: Client,
    hl: String,
    gl: String,
    ceid: String,
    resolve_redirects: bool,
    max_tries: u8,
}

impl GoogleRssAdapter {
    pub fn new(client: Client, cfg: &GoogleRssConfig, max_tries: u8) -> Self {
        Self {
            client,
            hl: cfg.hl.clone(),
            gl: cfg.gl.clone(),
            ceid: cfg.ceid.clone(),
            resolve_redirects: cfg.resolve_redirects,
            max_tries,
        }
    }

    fn feed_url(&self, query: &str) -> String {
        let q: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!(
            "https://news.google.com/rss/search?q={q}&hl={}&gl={}&ceid={}",
            self.hl, self.gl, self.ceid
        )
    }
}

#[async_trait]
impl SourceAdapter for GoogleRssAdapter {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<CandidateItem>> {
        let feed_url = self.feed_url(query);
        let resp = http::get_with_retry(&self.client, &feed_url, self.max_tries).await?;
        let body = resp.text().await.context("google news rss body")?;
        let mut items = parse_feed_str(&body, limit)?;

        if self.resolve_redirects {
            for it in &mut items {
                it.url = http::resolve_final_url(&self.client, &it.url).await;
            }
        }
        Ok(items)
    }

    fn name(&self) -> &'static str {
        SOURCE_TAG
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
