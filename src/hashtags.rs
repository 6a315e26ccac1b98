// src/hashtags.rs
//
// Static keyword -> hashtag table for rendered messages. Scanned in order,
// each row contributes at most one tag, output capped at MAX_TAGS. Matching
// is plain lowercase substring over title + URL.

pub const MAX_TAGS: usize = 5;
pub const FALLBACK_TAG: &str = "#NewsWatch";

const TAG_TABLE: &[(&[&str], &str)] = &[
    (&["customs", "border protection", "cbp"], "#Customs"),
    (&["treasury", "finance ministry", "fiscal"], "#Fiscal"),
    (&["import"], "#Imports"),
    (&["export"], "#Exports"),
    (&["excise", "tobacco", "cigarette"], "#Excise"),
    (&["narcotic", "drug", "meth", "cocaine"], "#Narcotics"),
    (&["smuggl", "contraband", "illicit"], "#Smuggling"),
    (&["bonded zone", "free trade zone", "bonded warehouse"], "#Facilities"),
    (&["port", "harbor", "airport", "cargo"], "#Logistics"),
    (&["tariff", "duty", "tax", "vat"], "#Tariffs"),
    (&["wco", "wto", "fta", "trade agreement", "origin"], "#Trade"),
    (&["seizure", "seized", "raid", "enforcement"], "#Enforcement"),
    (&["regulation", "decree", "ruling", "policy"], "#Regulation"),
];

pub fn hashtags(title: &str, url: &str) -> Vec<&'static str> {
    let t = title.to_lowercase();
    let u = url.to_lowercase();

    let mut out = Vec::new();
    for (keys, tag) in TAG_TABLE {
        if keys.iter().any(|k| t.contains(k) || u.contains(k)) {
            out.push(*tag);
        }
    }
    if out.is_empty() {
        out.push(FALLBACK_TAG);
    }
    out.truncate(MAX_TAGS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_title_and_url() {
        let tags = hashtags("Customs officers seize cargo", "https://example.com/tariff-news");
        assert!(tags.contains(&"#Customs"));
        assert!(tags.contains(&"#Enforcement"));
        assert!(tags.contains(&"#Tariffs"));
    }

    #[test]
    fn falls_back_when_nothing_matches() {
        assert_eq!(hashtags("quiet day", ""), vec![FALLBACK_TAG]);
    }

    #[test]
    fn cap_is_hard() {
        // A title touching many rows still yields at most MAX_TAGS.
        let t = "customs import export excise narcotics smuggling port tariff seizure regulation";
        assert_eq!(hashtags(t, "").len(), MAX_TAGS);
    }

    #[test]
    fn table_order_wins() {
        let tags = hashtags("customs import", "");
        assert_eq!(tags[0], "#Customs");
        assert_eq!(tags[1], "#Imports");
    }
}
