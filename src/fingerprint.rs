// src/fingerprint.rs

use crate::normalize::{normalize_title, normalize_url};

/// Content identity for an article: SHA-256 over the normalized URL and
/// title, hex-encoded. Serves as both the dedup key within a run and the
/// primary key in the seen store, so it must stay deterministic.
pub fn fingerprint(url: &str, title: &str) -> String {
    use sha2::{Digest, Sha256};
    let base = format!("{}|{}", normalize_url(url), normalize_title(title));
    let mut hasher = Sha256::new();
    hasher.update(base.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_hex_and_fixed_length() {
        let fp = fingerprint("https://example.com/a", "Foo");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn distinct_content_distinct_fingerprint() {
        let a = fingerprint("https://example.com/a", "Foo");
        let b = fingerprint("https://example.com/a", "Bar");
        assert_ne!(a, b);
    }
}
