// src/age.rs

use chrono::{DateTime, Utc};

use crate::source::CandidateItem;

/// Exactly one outcome per merged item. `NoDate` is never eligible: without
/// a timestamp recency cannot be established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeClass {
    Eligible,
    TooOld,
    NoDate,
}

pub fn classify(item: &CandidateItem, cutoff: DateTime<Utc>) -> AgeClass {
    match item.published_at {
        None => AgeClass::NoDate,
        Some(ts) if ts < cutoff => AgeClass::TooOld,
        Some(_) => AgeClass::Eligible,
    }
}

/// Newest first; undated items sort last. This order is the delivery order.
pub fn sort_newest_first(items: &mut [CandidateItem]) {
    items.sort_by_key(|it| {
        std::cmp::Reverse(it.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC))
    });
}
