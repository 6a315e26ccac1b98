// src/merge.rs

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::fingerprint::fingerprint;
use crate::source::CandidateItem;

/// Collapse candidates from all sources to one representative per
/// fingerprint. Tie-break, in order: a dated candidate beats an undated
/// representative; a strictly newer date beats an older one; otherwise the
/// first candidate seen this run stays. Items with neither URL nor title are
/// unusable for identity and are dropped. Output order is unspecified; the
/// age filter re-sorts.
pub fn merge_by_fingerprint(items: Vec<CandidateItem>) -> Vec<CandidateItem> {
    let mut by_fp: HashMap<String, CandidateItem> = HashMap::with_capacity(items.len());

    for item in items {
        if item.url.is_empty() && item.title.is_empty() {
            continue;
        }
        let fp = fingerprint(&item.url, &item.title);
        match by_fp.entry(fp) {
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                let replace = match (current.published_at, item.published_at) {
                    (None, Some(_)) => true,
                    (Some(old), Some(new)) => new > old,
                    _ => false,
                };
                if replace {
                    *current = item;
                }
            }
        }
    }

    by_fp.into_values().collect()
}
