use crate::types::SearchResult;

/// Domains that never contain article-style content worth analysing.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "youtube.com",
    "pinterest.",
    "instagram.com",
    "facebook.com",
    "olx.pl",
    "allegro.pl",
    "twitter.com",
    "tiktok.com",
    "wikipedia.org",
    ".gov",
    ".edu",
];

pub fn default_blocklist() -> Vec<String> {
    DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect()
}

/// Drops results without a URL and results whose URL contains any blocked
/// substring, compared case-insensitively. Order is preserved. Empty
/// block-list entries are ignored.
pub fn filter_results<S: AsRef<str>>(results: &[SearchResult], blocked: &[S]) -> Vec<SearchResult> {
    let blocked: Vec<String> = blocked
        .iter()
        .map(|b| b.as_ref().trim().to_lowercase())
        .filter(|b| !b.is_empty())
        .collect();

    results
        .iter()
        .filter(|r| {
            let url = r.url.trim().to_lowercase();
            !url.is_empty() && !blocked.iter().any(|b| url.contains(b.as_str()))
        })
        .cloned()
        .collect()
}
