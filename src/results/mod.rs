//! URL merge, deduplication, and truncation helpers
//!
//! Deduplication identity is the md5 digest of the raw URL string. No
//! scheme, trailing-slash, or tracking-parameter normalization is applied;
//! two spellings of the same page are distinct on purpose, so the literal
//! behavior stays observable in tests.

use std::collections::HashSet;

/// Dedup identity for a raw URL
fn url_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

/// Remove duplicates from a URL sequence, preserving first-seen order
pub fn dedupe_urls<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();
    for url in urls {
        if seen.insert(url_key(&url)) {
            unique.push(url);
        }
    }
    unique
}

/// Concatenate per-backend batches in priority order, dedupe, and truncate
pub fn merge_urls(batches: Vec<Vec<String>>, limit: usize) -> Vec<String> {
    let mut merged = dedupe_urls(batches.into_iter().flatten());
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dedupe_preserves_first_seen_order() {
        let out = dedupe_urls(urls(&["a", "b", "a", "c", "b"]));
        assert_eq!(out, urls(&["a", "b", "c"]));
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let once = dedupe_urls(urls(&["a", "b", "a", "c"]));
        let twice = dedupe_urls(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedupe_is_literal_not_normalized() {
        // Exact string identity: scheme and trailing slash variants survive
        let out = dedupe_urls(urls(&[
            "https://example.com",
            "https://example.com/",
            "http://example.com",
        ]));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_merge_keeps_priority_order_and_truncates() {
        let out = merge_urls(
            vec![urls(&["a", "b", "a", "c"]), urls(&["d", "e"])],
            5,
        );
        assert_eq!(out, urls(&["a", "b", "c", "d", "e"]));

        let out = merge_urls(vec![urls(&["a", "b", "c"]), urls(&["d", "e"])], 4);
        assert_eq!(out, urls(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_merge_dedupes_across_batches() {
        let out = merge_urls(vec![urls(&["a", "b"]), urls(&["b", "c"])], 10);
        assert_eq!(out, urls(&["a", "b", "c"]));
    }
}
