// tests/normalize.rs
use newswatch::normalize::{normalize_title, normalize_url};

#[test]
fn url_strips_fragment() {
    assert_eq!(
        normalize_url("https://example.com/a#section-2"),
        "https://example.com/a"
    );
}

#[test]
fn url_strips_full_tracking_denylist() {
    let u = "https://example.com/a?utm_source=s&utm_medium=m&utm_campaign=c&utm_term=t&utm_content=x&fbclid=f&gclid=g";
    assert_eq!(normalize_url(u), "https://example.com/a");
}

#[test]
fn url_keeps_content_params_in_order() {
    let u = "https://example.com/search?q=steel&utm_source=x&page=2";
    assert_eq!(normalize_url(u), "https://example.com/search?q=steel&page=2");
}

#[test]
fn url_scheme_host_path_untouched() {
    let u = "HTTPS://Example.COM/A/B%20C";
    assert_eq!(normalize_url(u), u);
}

#[test]
fn title_whitespace_case_quotes() {
    assert_eq!(normalize_title("  The \u{201C}Big\u{201D}   Story "), "the big story");
    assert_eq!(normalize_title("It\u{2019}s fine"), "its fine");
}

#[test]
fn empty_inputs_yield_empty() {
    assert_eq!(normalize_url(""), "");
    assert_eq!(normalize_title("   "), "");
}
