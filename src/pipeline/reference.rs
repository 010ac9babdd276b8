//! Reference links: the tier that never fails.

use crate::models::candidate::SOURCE_REFERENCE;
use crate::models::{CandidateEvent, RawCandidate, ReferenceLink};

use super::ranker::UNKNOWN_DATE_LABEL;

/// Snippet of a synthesized reference candidate.
pub const REFERENCE_SNIPPET: &str = "公式サイトのイベント一覧をご確認ください。";
/// Description of a reference event.
pub const REFERENCE_DESCRIPTION: &str = "最新情報はリンク先をご確認ください。";
/// Audience of a reference event; the link says nothing about it.
pub const REFERENCE_AUDIENCE: &str = "不明";
/// Heading of the notification footer.
pub const REFERENCE_HEADER: &str = "【参考リンク】";

/// One candidate per link, used when every other tier came back empty.
pub fn reference_candidates(links: &[ReferenceLink]) -> Vec<RawCandidate> {
    links
        .iter()
        .map(|link| {
            RawCandidate::new(format!("{}（公式）", link.name), SOURCE_REFERENCE)
                .with_snippet(REFERENCE_SNIPPET)
                .with_link(link.url.clone())
                .with_query(link.name.clone())
        })
        .collect()
}

/// One placeholder event per link.
pub fn build_reference_events(links: &[ReferenceLink]) -> Vec<CandidateEvent> {
    links
        .iter()
        .map(|link| CandidateEvent {
            title: link.name.clone(),
            date: UNKNOWN_DATE_LABEL.to_string(),
            location: link.name.clone(),
            description: REFERENCE_DESCRIPTION.to_string(),
            target_audience: REFERENCE_AUDIENCE.to_string(),
            url: link.url.clone(),
        })
        .collect()
}

/// Footer block listing every link, or an empty string when there are none.
pub fn format_reference_links(links: &[ReferenceLink]) -> String {
    if links.is_empty() {
        return String::new();
    }

    let mut footer = format!("\n\n{}", REFERENCE_HEADER);
    for link in links {
        footer.push_str(&format!("\n・{}: {}", link.name, link.url));
    }
    footer
}
