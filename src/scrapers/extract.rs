//! Listing extraction shared by the static and dynamic scrapers.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::discovery::DiscoveryError;
use crate::models::candidate::SOURCE_SCRAPE_PREFIX;
use crate::models::{EventSource, RawCandidate, Selectors};

/// Maximum description length kept from a listing, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Parsed field selectors for one source.
struct FieldSelectors {
    container: Selector,
    title: Selector,
    date: Selector,
    description: Selector,
    link: Selector,
}

impl FieldSelectors {
    fn parse(selectors: &Selectors) -> Result<Self, DiscoveryError> {
        Ok(Self {
            container: parse_selector(&selectors.container)?,
            title: parse_selector(&selectors.title)?,
            date: parse_selector(&selectors.date)?,
            description: parse_selector(&selectors.description)?,
            link: parse_selector(&selectors.link)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DiscoveryError> {
    Selector::parse(selector)
        .map_err(|e| DiscoveryError::Parse(format!("Invalid selector '{}': {:?}", selector, e)))
}

/// Pull up to `max_items` listings out of a page.
///
/// Elements without a title are skipped. An unusable selector fails the
/// whole source.
pub fn extract_candidates(
    html: &str,
    source: &EventSource,
    max_items: usize,
) -> Result<Vec<RawCandidate>, DiscoveryError> {
    let selectors = FieldSelectors::parse(&source.selectors)?;
    let document = Html::parse_document(html);

    let candidates: Vec<RawCandidate> = document
        .select(&selectors.container)
        .take(max_items)
        .filter_map(|element| {
            let candidate = extract_one(element, &selectors, source);
            if candidate.is_none() {
                debug!("Skipping element without title on {}", source.name);
            }
            candidate
        })
        .collect();

    Ok(candidates)
}

fn extract_one(
    element: ElementRef<'_>,
    selectors: &FieldSelectors,
    source: &EventSource,
) -> Option<RawCandidate> {
    let title = first_text(element, &selectors.title)?;
    if title.is_empty() {
        return None;
    }

    let date = first_text(element, &selectors.date).unwrap_or_default();
    let description = first_text(element, &selectors.description)
        .map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS))
        .unwrap_or_default();

    let link = element
        .select(&selectors.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| resolve_link(&source.url, href))
        .unwrap_or_default();

    let snippet = if date.is_empty() {
        description
    } else {
        format!("{} - {}", date, description)
    };

    Some(
        RawCandidate::new(title, format!("{}{}", SOURCE_SCRAPE_PREFIX, source.name))
            .with_snippet(snippet)
            .with_link(link)
            .with_query(source.name.clone()),
    )
}

/// Text of the first match, with each text node trimmed and joined.
fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().map(str::trim).collect::<String>())
}

/// Resolve an href found on `page_url` to an absolute http(s) URL.
///
/// Anything that does not resolve to http(s) (`javascript:`, `mailto:`,
/// garbage) falls back to the page URL itself.
pub fn resolve_link(page_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|u| u.to_string())
        .unwrap_or_else(|| page_url.to_string())
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <article>
            <h2> 親子で  <span>リトミック</span> </h2>
            <time>1月25日(土)</time>
            <p>0歳から参加できます。</p>
            <a href="/events/rhythm">詳細</a>
          </article>
          <article>
            <p>タイトルのない記事</p>
          </article>
          <article>
            <h3>夏祭り</h3>
            <a href="https://other.example.org/matsuri">詳細</a>
          </article>
        </body></html>
    "#;

    fn source() -> EventSource {
        EventSource::new("けいはんなプラザ", "https://example.com/events/index.html")
    }

    #[test]
    fn test_extracts_listings_and_skips_untitled() {
        let candidates = extract_candidates(LISTING, &source(), 10).unwrap();
        assert_eq!(candidates.len(), 2);

        let first = &candidates[0];
        assert_eq!(first.title, "親子でリトミック");
        assert_eq!(first.snippet, "1月25日(土) - 0歳から参加できます。");
        assert_eq!(first.link, "https://example.com/events/rhythm");
        assert_eq!(first.source, "scrape:けいはんなプラザ");
        assert_eq!(first.query, "けいはんなプラザ");

        let second = &candidates[1];
        assert_eq!(second.title, "夏祭り");
        assert_eq!(second.snippet, "");
        assert_eq!(second.link, "https://other.example.org/matsuri");
    }

    #[test]
    fn test_caps_container_count() {
        let html: String = (0..15)
            .map(|i| format!("<article><h2>イベント{}</h2></article>", i))
            .collect();
        let candidates = extract_candidates(&html, &source(), 10).unwrap();
        assert_eq!(candidates.len(), 10);
        assert_eq!(candidates[9].title, "イベント9");
    }

    #[test]
    fn test_description_is_truncated() {
        let long = "あ".repeat(250);
        let html = format!("<article><h2>長文</h2><p>{}</p></article>", long);
        let candidates = extract_candidates(&html, &source(), 10).unwrap();
        assert_eq!(candidates[0].snippet.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_custom_selectors() {
        let mut source = source();
        source.selectors.container = "li.event".to_string();
        source.selectors.title = ".name".to_string();
        source.selectors.date = ".when".to_string();
        let html = r#"<ul>
            <li class="event"><span class="name">工作教室</span><span class="when">2/1</span></li>
            <li class="other"><span class="name">無関係</span></li>
        </ul>"#;
        let candidates = extract_candidates(html, &source, 10).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "工作教室");
        assert_eq!(candidates[0].snippet, "2/1 - ");
    }

    #[test]
    fn test_invalid_selector_fails_source() {
        let mut source = source();
        source.selectors.container = "article[".to_string();
        assert!(matches!(
            extract_candidates(LISTING, &source, 10),
            Err(DiscoveryError::Parse(_))
        ));
    }

    #[test]
    fn test_resolve_link_variants() {
        let page = "https://example.com:8443/events/list.html";
        assert_eq!(
            resolve_link(page, "/detail/1"),
            "https://example.com:8443/detail/1"
        );
        assert_eq!(
            resolve_link(page, "detail.html"),
            "https://example.com:8443/events/detail.html"
        );
        assert_eq!(
            resolve_link(page, "//cdn.example.com/a"),
            "https://cdn.example.com/a"
        );
        assert_eq!(resolve_link(page, "http://x.test/"), "http://x.test/");
        assert_eq!(resolve_link(page, "javascript:void(0)"), page);
    }

    #[test]
    fn test_truncate_chars_is_char_aware() {
        assert_eq!(truncate_chars("木津川市", 2), "木津");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
