//! Blocklist filtering and deduplication.

use std::collections::HashSet;

use crate::config::FilteringConfig;
use crate::models::RawCandidate;

/// Drop candidates whose text contains any exclude keyword.
pub fn filter_excluded(
    candidates: Vec<RawCandidate>,
    filtering: &FilteringConfig,
) -> Vec<RawCandidate> {
    candidates
        .into_iter()
        .filter(|c| !filtering.is_excluded(&c.match_text()))
        .collect()
}

/// Remove repeated `(title, link)` pairs, keeping the first occurrence.
pub fn dedup(candidates: Vec<RawCandidate>) -> Vec<RawCandidate> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.title.clone(), c.link.clone())))
        .collect()
}

/// Exclude filter followed by dedup. Applying it twice changes nothing.
pub fn filter_and_dedup(
    candidates: Vec<RawCandidate>,
    filtering: &FilteringConfig,
) -> Vec<RawCandidate> {
    dedup(filter_excluded(candidates, filtering))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtering() -> FilteringConfig {
        FilteringConfig {
            family_keywords: vec!["子供".to_string()],
            exclude_keywords: vec!["募集".to_string()],
        }
    }

    fn candidate(title: &str, link: &str) -> RawCandidate {
        RawCandidate::new(title, "google_search").with_link(link)
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let deduped = dedup(vec![
            candidate("イベントA", "https://example.com/a").with_snippet("first"),
            candidate("イベントA", "https://example.com/a").with_snippet("second"),
            candidate("イベントB", "https://example.com/b"),
            candidate("イベントA", "https://example.com/other"),
        ]);
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped[0].snippet, "first");
        assert_eq!(deduped[1].title, "イベントB");
        assert_eq!(deduped[2].link, "https://example.com/other");
    }

    #[test]
    fn test_exclude_matches_snippet_too() {
        let kept = filter_excluded(
            vec![
                candidate("子供向けイベント", ""),
                candidate("イベント募集のお知らせ", ""),
                candidate("お知らせ", "").with_snippet("出店者を募集中"),
            ],
            &filtering(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "子供向けイベント");
    }

    #[test]
    fn test_filter_and_dedup_is_idempotent() {
        let input = vec![
            candidate("イベントA", "https://example.com/a"),
            candidate("スタッフ募集", "https://example.com/r"),
            candidate("イベントA", "https://example.com/a"),
            candidate("イベントB", ""),
        ];
        let once = filter_and_dedup(input, &filtering());
        let twice = filter_and_dedup(once.clone(), &filtering());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }
}
