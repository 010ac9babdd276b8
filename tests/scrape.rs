//! Site scraping tier against a local server.

mod common;

use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use encoding_rs::SHIFT_JIS;

use eventscout::config::Credentials;
use eventscout::pipeline::EventOrigin;
use eventscout::{DiscoveryError, ReferenceLink, Tier};

use common::{client, fast_config, source, spawn_server, AEON_PAGE, PLAZA_PAGE};

fn site_router() -> Router {
    Router::new()
        .route("/aeon", get(|| async { Html(AEON_PAGE) }))
        .route("/plaza", get(|| async { Html(PLAZA_PAGE) }))
        .route(
            "/sjis",
            get(|| async {
                let (bytes, _, _) = SHIFT_JIS
                    .encode("<article><h2>木津川市 子育てフェスタ</h2><p>入場無料</p></article>");
                ([(header::CONTENT_TYPE, "text/html")], bytes.into_owned())
            }),
        )
        .route(
            "/gone",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Html(PLAZA_PAGE)
            }),
        )
}

#[tokio::test]
async fn sources_are_scraped_in_priority_order() {
    let base = spawn_server(site_router()).await;
    let yaml = format!(
        r#"
sources:
  - name: けいはんなプラザ
    url: {base}/plaza
    priority: 2
  - name: 高の原イオン
    url: {base}/aeon
    priority: 1
scraping:
  request_delay: 0
  timeout: 5
"#
    );
    let config = eventscout::EventConfig::parse(&yaml).unwrap();

    let report = client(config, Credentials::default())
        .search_events_with_report()
        .await;

    let units: Vec<&str> = report
        .tier_outcomes(Tier::Scrape)
        .map(|o| o.unit.as_str())
        .collect();
    assert_eq!(units, vec!["高の原イオン", "けいはんなプラザ"]);

    let titles: Vec<&str> = report.candidates.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["親子でリトミック", "出店者募集のお知らせ", "冬の星空観察会"]
    );

    let first = &report.candidates[0];
    assert_eq!(first.source, "scrape:高の原イオン");
    assert_eq!(first.query, "高の原イオン");
    assert_eq!(first.snippet, "1月25日(土) - 0歳から参加できます。");
    assert_eq!(first.link, format!("{}/events/rhythm", base));

    assert_eq!(report.candidates[2].link, "https://plaza.example.org/stars");
    assert_eq!(report.candidates[2].snippet, "2/1 - 子供向けの解説があります。");
}

#[tokio::test]
async fn shift_jis_page_is_decoded() {
    let base = spawn_server(site_router()).await;
    let mut config = fast_config();
    config.sources = vec![source("木津川市", format!("{}/sjis", base), 1)];

    let candidates = client(config, Credentials::default()).search_events().await;

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].title, "木津川市 子育てフェスタ");
    assert_eq!(candidates[0].snippet, "入場無料");
}

#[tokio::test]
async fn unavailable_source_does_not_stop_others() {
    let base = spawn_server(site_router()).await;
    let mut config = fast_config();
    config.sources = vec![
        source("メンテ中", format!("{}/gone", base), 1),
        source("けいはんなプラザ", format!("{}/plaza", base), 2),
    ];

    let report = client(config, Credentials::default())
        .search_events_with_report()
        .await;

    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].title, "冬の星空観察会");

    let failure = report.failures().next().unwrap();
    assert_eq!(failure.unit, "メンテ中");
    assert!(matches!(
        failure.error(),
        Some(DiscoveryError::SourceUnavailable { status: 503, .. })
    ));
}

#[tokio::test]
async fn slow_source_times_out() {
    let base = spawn_server(site_router()).await;
    let mut config = fast_config();
    config.scraping.timeout = 1;
    config.sources = vec![source("遅いサイト", format!("{}/slow", base), 1)];

    let report = client(config, Credentials::default())
        .search_events_with_report()
        .await;

    assert!(report.candidates.is_empty());
    assert!(matches!(
        report.failures().next().and_then(|o| o.error()),
        Some(DiscoveryError::Timeout(_))
    ));
}

#[tokio::test]
async fn dynamic_source_without_browser_is_skipped() {
    let base = spawn_server(site_router()).await;
    let mut config = fast_config();
    let mut dynamic = source("ガーデンモール木津川", format!("{}/aeon", base), 1);
    dynamic.dynamic = true;
    config.sources = vec![dynamic, source("けいはんなプラザ", format!("{}/plaza", base), 2)];

    let report = client(config, Credentials::default())
        .search_events_with_report()
        .await;

    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].source, "scrape:けいはんなプラザ");
    assert!(matches!(
        report.failures().next().and_then(|o| o.error()),
        Some(DiscoveryError::RenderUnavailable)
    ));
}

#[tokio::test]
async fn max_items_per_source_is_configurable() {
    let page: String = (0..6)
        .map(|i| format!("<article><h2>イベント{}</h2></article>", i))
        .collect();
    let app = Router::new().route("/many", get(move || async move { Html(page) }));
    let base = spawn_server(app).await;

    let mut config = fast_config();
    config.scraping.max_items_per_source = 4;
    config.sources = vec![source("多い", format!("{}/many", base), 1)];

    let candidates = client(config, Credentials::default()).search_events().await;
    assert_eq!(candidates.len(), 4);
}

#[tokio::test]
async fn excluded_candidates_do_not_trigger_reference_candidates() {
    let base = spawn_server(site_router()).await;
    let mut config = fast_config();
    config.sources = vec![source("けいはんなプラザ", format!("{}/plaza", base), 1)];
    config.filtering.exclude_keywords = vec!["星空".to_string()];
    config.reference_links = vec![ReferenceLink::new("高の原イオン", "https://example.com/aeon")];

    let client = client(config, Credentials::default());
    let report = client.search_events_with_report().await;

    // References stand in for an empty collection, not an empty filter result
    assert_eq!(report.tier_count(Tier::Scrape), 1);
    assert!(report.candidates.is_empty());
    assert!(report.is_exhausted());
    assert_eq!(report.tier_outcomes(Tier::Reference).count(), 0);
    assert!(!report.skipped.contains(&Tier::Reference));

    let digest = client.resolve_events(None, report.candidates, 10).await;
    assert_eq!(digest.origin, EventOrigin::Reference);
    assert_eq!(digest.events.len(), 1);
    assert_eq!(digest.events[0].title, "高の原イオン");
}

#[tokio::test]
async fn out_of_range_config_values_fall_back_to_defaults() {
    let base = spawn_server(site_router()).await;
    let yaml = format!(
        r#"
sources:
  - name: ガーデンモール木津川
    url: {base}/aeon
    priority: 1
    dynamic: true
    wait_time: .inf
  - name: けいはんなプラザ
    url: {base}/plaza
    priority: 2
scraping:
  request_delay: .inf
  timeout: 5
search:
  query_delay: .inf
utc_offset_hours: 1000000
"#
    );
    let config = eventscout::EventConfig::parse(&yaml).unwrap();
    assert_eq!(config.scraping.request_delay(), Duration::from_secs(1));
    assert_eq!(config.utc_offset_hours, 0);
    let _ = config.today();

    let report = client(config, Credentials::default())
        .search_events_with_report()
        .await;

    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].title, "冬の星空観察会");
    assert!(matches!(
        report.failures().next().and_then(|o| o.error()),
        Some(DiscoveryError::RenderUnavailable)
    ));
}
