//! newswatch — binary entrypoint. Performs exactly one run: poll sources,
//! dedup against the seen store, deliver new items, send the heartbeat.
//!
//! Secrets come from the environment (`TELEGRAM_BOT_TOKEN`,
//! `TELEGRAM_CHAT_ID`, optional `NEWSAPI_KEY`); the rest from
//! `config/newswatch.toml`.

use chrono::{Duration, Utc};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newswatch::config;
use newswatch::run::{run_once, SourcePlan};
use newswatch::sink::{Sink, TelegramSink};
use newswatch::source::google_rss::GoogleRssAdapter;
use newswatch::source::http;
use newswatch::source::newsapi::NewsApiAdapter;
use newswatch::store::SeenStore;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newswatch=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env in local/dev; no-op when the vars come from the scheduler.
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = real_main().await {
        tracing::error!(error = ?e, "run failed");
        std::process::exit(1);
    }
}

async fn real_main() -> anyhow::Result<()> {
    let cfg = config::load_default()?;
    let client = http::build_client(cfg.http_timeout_secs)?;
    let sink = TelegramSink::from_env()?;
    let mut store = SeenStore::open(&cfg.db_path)?;

    let cutoff = Utc::now() - Duration::hours(cfg.max_age_hours);

    let mut plans: Vec<SourcePlan> = Vec::new();
    if cfg.google_rss.enabled {
        plans.push(SourcePlan {
            adapter: Box::new(GoogleRssAdapter::new(
                client.clone(),
                &cfg.google_rss,
                cfg.max_tries,
            )),
            query: cfg.google_rss.query.clone(),
            limit: cfg.google_rss.limit,
        });
    }
    match NewsApiAdapter::from_env(client.clone(), &cfg.newsapi, cutoff, cfg.max_tries) {
        Some(adapter) => plans.push(SourcePlan {
            adapter: Box::new(adapter),
            query: cfg.newsapi.query.clone(),
            limit: cfg.newsapi.limit,
        }),
        None => tracing::info!("NEWSAPI_KEY not set, running RSS-only"),
    }

    match run_once(&plans, &mut store, &sink, &cfg).await {
        Ok(summary) => {
            tracing::info!(?summary, "newswatch done");
            Ok(())
        }
        Err(e) => {
            // Best-effort failure notice before the non-zero exit.
            let notice = format!("\u{274C} newswatch run failed: {e}");
            if let Err(send_err) = sink.send(&notice).await {
                tracing::warn!(error = %send_err, "failure notice could not be sent");
            }
            Err(e.into())
        }
    }
}
