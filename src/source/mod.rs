// src/source/mod.rs

pub mod google_rss;
pub mod http;
pub mod newsapi;

use chrono::{DateTime, Utc};

/// One article candidate as reported by a source, before merging. Lives only
/// for the run that fetched it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandidateItem {
    pub source: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Best-effort fetch of up to `limit` candidates for `query`. Adapters
    /// own redirect resolution for indirect links and supply the source tag
    /// and publication timestamp when the provider exposes one.
    async fn fetch(&self, query: &str, limit: usize) -> anyhow::Result<Vec<CandidateItem>>;

    fn name(&self) -> &'static str;
}
