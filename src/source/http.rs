// src/source/http.rs
//
// Shared HTTP plumbing for the adapters: one client per run, bounded-retry
// GET, and best-effort redirect resolution with an explicit fallback value.

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use std::time::Duration;

use crate::normalize::normalize_url;

const USER_AGENT: &str = "Mozilla/5.0 (newswatch)";

pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("building http client")
}

/// GET with bounded retries and exponential backoff on transport failure.
/// Non-2xx statuses are returned to the caller, not retried here.
pub async fn get_with_retry(client: &Client, url: &str, max_tries: u8) -> Result<Response> {
    let mut attempt: u8 = 0;
    loop {
        attempt += 1;
        match client.get(url).send().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                if attempt < max_tries {
                    tracing::debug!(error = ?e, attempt, url, "GET failed, backing off");
                    tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                    continue;
                }
                return Err(e).with_context(|| format!("GET {url}"));
            }
        }
    }
}

/// Follow redirects to the final URL: HEAD first, GET as fallback. On any
/// failure the normalized original is returned, so a dead redirector never
/// drops an item.
pub async fn resolve_final_url(client: &Client, raw: &str) -> String {
    let url = normalize_url(raw);
    if url.is_empty() {
        return url;
    }

    match client.head(&url).send().await {
        Ok(resp) => return normalize_url(resp.url().as_str()),
        Err(e) => {
            tracing::debug!(error = ?e, url, "HEAD redirect resolution failed, trying GET");
        }
    }

    match client.get(&url).send().await {
        Ok(resp) => normalize_url(resp.url().as_str()),
        Err(e) => {
            tracing::debug!(error = ?e, url, "GET redirect resolution failed, keeping original");
            url
        }
    }
}
