// src/dispatch.rs
//
// Turns the delivery list into rendered Telegram-sized messages and pushes
// them through the sink with bounded retry. A failed part is counted and
// logged, never fatal; the coordinator reports it in the run summary.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::time::Duration;

use crate::hashtags::hashtags;
use crate::sink::{Sink, SinkError};
use crate::source::CandidateItem;

const HEADER: &str = "\u{1F5DE}\u{FE0F} Newswatch update (latest)";
const DISPLAY_URL_MAX_LEN: usize = 60;

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub sent_parts: usize,
    pub failed_parts: usize,
}

pub struct BatchDispatcher<'a> {
    sink: &'a dyn Sink,
    batch_size: usize,
    max_tries: u8,
    tz: FixedOffset,
    tz_label: String,
}

impl<'a> BatchDispatcher<'a> {
    pub fn new(
        sink: &'a dyn Sink,
        batch_size: usize,
        max_tries: u8,
        utc_offset_hours: i32,
        tz_label: &str,
    ) -> Self {
        let tz = FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
        Self {
            sink,
            batch_size: batch_size.max(1),
            max_tries: max_tries.max(1),
            tz,
            tz_label: tz_label.to_string(),
        }
    }

    /// Deliver `items` in order, `batch_size` per message. Returns counts of
    /// sent and failed message parts.
    pub async fn dispatch(&self, items: &[CandidateItem]) -> DispatchReport {
        let mut report = DispatchReport::default();
        if items.is_empty() {
            return report;
        }

        for batch in items.chunks(self.batch_size) {
            let blocks = self.render_batch(batch);
            for part in pack_blocks(&blocks, self.sink.max_message_len()) {
                match self.send_with_retry(&part).await {
                    Ok(()) => report.sent_parts += 1,
                    Err(e) => {
                        report.failed_parts += 1;
                        tracing::error!(error = %e, "dispatch part failed after retries");
                    }
                }
            }
        }
        report
    }

    /// Send a single short notice (heartbeat, failure note) with the same
    /// retry policy and splitting as regular parts.
    pub async fn send_notice(&self, text: &str) -> Result<(), SinkError> {
        let blocks = vec![text.to_string()];
        for part in pack_blocks(&blocks, self.sink.max_message_len()) {
            self.send_with_retry(&part).await?;
        }
        Ok(())
    }

    fn render_batch(&self, batch: &[CandidateItem]) -> Vec<String> {
        let mut blocks = Vec::with_capacity(batch.len() + 1);
        blocks.push(HEADER.to_string());

        for it in batch {
            let title = it.title.trim();
            let url = it.url.trim();
            let tags = hashtags(title, url).join(" ");
            let block = format!(
                "\u{1F4F0} {title}\n\u{1F552} {}\n\u{1F4CC} {}\n\u{1F3F7}\u{FE0F} {tags}\n\u{1F517} {}\n{url}",
                self.format_ts(it.published_at),
                if it.source.is_empty() { "-" } else { it.source.as_str() },
                short_display_url(url, DISPLAY_URL_MAX_LEN),
            );
            blocks.push(block);
        }
        blocks
    }

    fn format_ts(&self, ts: Option<DateTime<Utc>>) -> String {
        match ts {
            None => "Unknown".to_string(),
            Some(t) => format!(
                "{} {}",
                t.with_timezone(&self.tz).format("%Y-%m-%d %H:%M"),
                self.tz_label
            ),
        }
    }

    async fn send_with_retry(&self, text: &str) -> Result<(), SinkError> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            match self.sink.send(text).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < self.max_tries => {
                    tracing::warn!(error = %e, attempt, "sink send failed, backing off");
                    tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Visual short link: host + truncated path. The full URL still goes out on
/// its own line so the message stays clickable.
pub fn short_display_url(u: &str, max_len: usize) -> String {
    if u.is_empty() {
        return String::new();
    }
    let mut display = match url::Url::parse(u) {
        Ok(parsed) => {
            let mut d = format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path());
            if parsed.query().is_some() {
                d.push('?');
            }
            d
        }
        Err(_) => u.to_string(),
    };
    if display.chars().count() > max_len {
        display = display.chars().take(max_len.saturating_sub(1)).collect();
        display.push('\u{2026}');
    }
    display
}

/// Pack rendered blocks into messages of at most `limit` chars, joining with
/// blank lines. A block never straddles two parts unless it is itself over
/// the limit, in which case it is split at line boundaries.
fn pack_blocks(blocks: &[String], limit: usize) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();

    for block in blocks {
        if block.len() > limit {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            parts.extend(split_at_lines(block, limit));
            continue;
        }
        let joined_len = if current.is_empty() {
            block.len()
        } else {
            current.len() + 2 + block.len()
        };
        if !current.is_empty() && joined_len > limit {
            parts.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(block);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Line-boundary split for an oversized text. A single line longer than the
/// limit becomes its own oversized part rather than being cut mid-line.
fn split_at_lines(text: &str, limit: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    for line in text.split_inclusive('\n') {
        if !current.is_empty() && current.len() + line.len() > limit {
            parts.push(std::mem::take(&mut current));
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_url_keeps_host_and_path() {
        let s = short_display_url("https://example.com/news/story?a=1", 60);
        assert_eq!(s, "example.com/news/story?");
    }

    #[test]
    fn short_url_truncates_with_ellipsis() {
        let long = format!("https://example.com/{}", "x".repeat(100));
        let s = short_display_url(&long, 60);
        assert_eq!(s.chars().count(), 60);
        assert!(s.ends_with('\u{2026}'));
    }

    #[test]
    fn pack_keeps_blocks_whole() {
        let blocks = vec!["a".repeat(40), "b".repeat(40), "c".repeat(40)];
        let parts = pack_blocks(&blocks, 90);
        // First two blocks fit together (40 + 2 + 40), third overflows.
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains(&blocks[0]) && parts[0].contains(&blocks[1]));
        assert_eq!(parts[1], blocks[2]);
    }

    #[test]
    fn oversized_block_splits_at_line_boundaries() {
        let block = format!("{}\n{}\n{}", "a".repeat(30), "b".repeat(30), "c".repeat(30));
        let parts = pack_blocks(&[block], 65);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with(&"a".repeat(30)));
        assert!(parts[1].starts_with(&"c".repeat(30)));
    }

    #[test]
    fn single_long_line_is_not_cut() {
        let line = "x".repeat(200);
        let parts = split_at_lines(&line, 50);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0], line);
    }
}
