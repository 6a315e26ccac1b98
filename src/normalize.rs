// src/normalize.rs
//
// Canonical forms for URLs and titles. Both functions are pure; they feed the
// fingerprint, so any change here changes dedup identity across runs.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Query parameters that carry tracking state, not content identity.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
];

/// Drop the fragment and tracking query params. Remaining params keep their
/// original order; scheme, host and path are left untouched.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let no_fragment = trimmed.split('#').next().unwrap_or_default().trim();
    let Some((base, query)) = no_fragment.split_once('?') else {
        return no_fragment.to_string();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            if pair.is_empty() {
                return false;
            }
            let name = pair.split('=').next().unwrap_or(pair);
            !TRACKING_PARAMS.contains(&name)
        })
        .collect();

    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}

/// Trim, lowercase, fold whitespace runs, strip quote glyphs (curly and
/// straight, double and single).
pub fn normalize_title(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let mut out = raw.trim().to_lowercase();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    out = re_ws.replace_all(&out, " ").to_string();

    static RE_QUOTES: OnceCell<Regex> = OnceCell::new();
    let re_quotes =
        RE_QUOTES.get_or_init(|| Regex::new("[\u{201C}\u{201D}\"\u{2018}\u{2019}']+").expect("quote regex"));
    out = re_quotes.replace_all(&out, "").to_string();

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_ok() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn drops_fragment_and_tracking_params() {
        let u = "https://example.com/a?utm_source=x&b=1&fbclid=abc#section";
        assert_eq!(normalize_url(u), "https://example.com/a?b=1");
    }

    #[test]
    fn preserves_param_order() {
        let u = "https://example.com/a?z=9&utm_medium=m&a=1";
        assert_eq!(normalize_url(u), "https://example.com/a?z=9&a=1");
    }

    #[test]
    fn bare_question_mark_is_removed() {
        assert_eq!(normalize_url("https://example.com/a?"), "https://example.com/a");
        assert_eq!(
            normalize_url("https://example.com/a?utm_source=x"),
            "https://example.com/a"
        );
    }

    #[test]
    fn title_folds_case_whitespace_and_quotes() {
        assert_eq!(normalize_title("  Foo \t  BAR "), "foo bar");
        assert_eq!(normalize_title("\u{201C}Foo\u{201D} 'bar'"), "foo bar");
        assert_eq!(normalize_title(""), "");
    }
}
