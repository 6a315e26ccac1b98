// src/run.rs
//
// One invocation end to end: init store, fetch all sources, merge, filter by
// age, gate against the seen store, dispatch batches, heartbeat.

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::age::{self, AgeClass};
use crate::config::RunConfig;
use crate::dispatch::BatchDispatcher;
use crate::fingerprint::fingerprint;
use crate::merge::merge_by_fingerprint;
use crate::sink::Sink;
use crate::source::{CandidateItem, SourceAdapter};
use crate::store::{SeenStore, StoreError};

/// An adapter paired with its query and item cap for this run.
pub struct SourcePlan {
    pub adapter: Box<dyn SourceAdapter>,
    pub query: String,
    pub limit: usize,
}

/// Only storage trouble aborts a run; everything else degrades and is
/// reported in the summary.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("seen store failure: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub new: usize,
    pub already_seen: usize,
    pub too_old: usize,
    pub no_date: usize,
    pub merged_total: usize,
    pub delivery_failures: usize,
}

pub async fn run_once(
    plans: &[SourcePlan],
    store: &mut SeenStore,
    sink: &dyn Sink,
    cfg: &RunConfig,
) -> Result<RunSummary, RunError> {
    // Storage must be healthy before anything is fetched or marked.
    store.initialize()?;

    let now = Utc::now();
    let cutoff = now - Duration::hours(cfg.max_age_hours);

    let mut raw: Vec<CandidateItem> = Vec::new();
    for plan in plans {
        match plan.adapter.fetch(&plan.query, plan.limit).await {
            Ok(mut items) => {
                tracing::info!(source = plan.adapter.name(), fetched = items.len(), "source fetched");
                raw.append(&mut items);
            }
            Err(e) => {
                // One broken source never takes the run down.
                tracing::warn!(error = ?e, source = plan.adapter.name(), "source fetch failed, continuing");
            }
        }
    }

    let mut merged = merge_by_fingerprint(raw);
    age::sort_newest_first(&mut merged);

    let mut summary = RunSummary {
        merged_total: merged.len(),
        ..RunSummary::default()
    };
    let mut to_deliver: Vec<CandidateItem> = Vec::new();

    for item in merged {
        match age::classify(&item, cutoff) {
            AgeClass::NoDate => summary.no_date += 1,
            AgeClass::TooOld => summary.too_old += 1,
            AgeClass::Eligible => {
                let fp = fingerprint(&item.url, &item.title);
                if store.is_seen(&fp)? {
                    summary.already_seen += 1;
                    continue;
                }
                // Mark before dispatch: a transient sink failure must never
                // redeliver this item on the next run. The accepted cost is
                // that an item marked here is lost if every send attempt
                // below fails.
                store.mark_seen(&fp, &item.url, &item.title)?;
                to_deliver.push(item);
            }
        }
    }
    summary.new = to_deliver.len();

    let dispatcher = BatchDispatcher::new(
        sink,
        cfg.batch_size,
        cfg.max_tries,
        cfg.display_utc_offset_hours,
        &cfg.tz_label,
    );
    let report = dispatcher.dispatch(&to_deliver).await;
    summary.delivery_failures = report.failed_parts;

    if cfg.heartbeat_on_empty || summary.new > 0 {
        let text = heartbeat_text(&summary, cfg.max_age_hours);
        if let Err(e) = dispatcher.send_notice(&text).await {
            tracing::warn!(error = %e, "heartbeat send failed");
        }
    }

    tracing::info!(
        new = summary.new,
        already_seen = summary.already_seen,
        too_old = summary.too_old,
        no_date = summary.no_date,
        merged = summary.merged_total,
        delivery_failures = summary.delivery_failures,
        "run complete"
    );
    Ok(summary)
}

fn heartbeat_text(s: &RunSummary, window_hours: i64) -> String {
    let mut text = format!(
        "\u{2705} newswatch OK. New: {}. Skipped seen: {}. Skipped old: {}. \
         No-date skipped: {}. Fetched (after merge): {}. Window: {window_hours}h.",
        s.new, s.already_seen, s.too_old, s.no_date, s.merged_total
    );
    if s.delivery_failures > 0 {
        text.push_str(&format!(" Delivery failures: {}.", s.delivery_failures));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_mentions_failures_only_when_present() {
        let mut s = RunSummary {
            new: 2,
            already_seen: 1,
            ..RunSummary::default()
        };
        let clean = heartbeat_text(&s, 24);
        assert!(clean.contains("New: 2"));
        assert!(!clean.contains("Delivery failures"));

        s.delivery_failures = 3;
        assert!(heartbeat_text(&s, 24).contains("Delivery failures: 3."));
    }
}
