// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end extractor tests against a local HTTP server and a canned fetcher.

use std::time::Duration;

use tracing_test::traced_test;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wishlist_config::model::ScraperConfig;
use wishlist_core::{FetchError, FetchedPage, NewWish};
use wishlist_metadata::{host_of, ExtractionOutcome, MetadataExtractor};
use wishlist_test_utils::MockFetcher;

fn scraper_config() -> ScraperConfig {
    ScraperConfig {
        timeout_secs: 2,
        user_agent: "Mozilla/5.0 (WishlistTest)".to_string(),
    }
}

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn open_graph_tags_are_returned_verbatim() {
    let body = r#"<html><head>
        <title>Generic Shop</title>
        <meta property="og:title" content="Walnut Desk Lamp">
        <meta property="og:image" content="https://cdn.example.com/lamp.jpg">
    </head><body><img src="/logo.png"></body></html>"#;
    let server = serve(
        "/lamp",
        ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"),
    )
    .await;

    let extractor = MetadataExtractor::new(&scraper_config()).unwrap();
    let (name, thumb) = extractor
        .extract(Some(&format!("{}/lamp", server.uri())), None)
        .await;

    assert_eq!(name.as_deref(), Some("Walnut Desk Lamp"));
    assert_eq!(thumb.as_deref(), Some("https://cdn.example.com/lamp.jpg"));
}

#[tokio::test]
async fn bare_title_is_trimmed_and_capped() {
    let long = "b".repeat(300);
    let body = format!("<html><head><title>   {long}   </title></head></html>");
    let server = serve("/long", ResponseTemplate::new(200).set_body_string(body)).await;

    let extractor = MetadataExtractor::new(&scraper_config()).unwrap();
    let (name, thumb) = extractor
        .extract(Some(&format!("{}/long", server.uri())), None)
        .await;

    assert_eq!(name, Some("b".repeat(200)));
    assert!(thumb.is_none());
}

#[tokio::test]
async fn not_found_falls_back_to_host() {
    let server = serve("/gone", ResponseTemplate::new(404).set_body_string("<title>Nope</title>")).await;
    let url = format!("{}/gone", server.uri());

    let extractor = MetadataExtractor::new(&scraper_config()).unwrap();
    let outcome = extractor.extract_outcome(Some(&url), None).await;

    assert!(matches!(
        &outcome,
        ExtractionOutcome::Fallback { failure: FetchError::Status(404), .. }
    ));
    assert_eq!(outcome.name(), Some(host_of(&url).as_str()));
    assert!(outcome.thumbnail_url().is_none());
}

#[tokio::test]
async fn unreachable_host_falls_back_without_error() {
    let url = "http://127.0.0.1:1/wish";
    let extractor = MetadataExtractor::new(&scraper_config()).unwrap();
    let (name, thumb) = extractor.extract(Some(url), None).await;

    assert_eq!(name.as_deref(), Some("127.0.0.1:1"));
    assert!(thumb.is_none());
}

#[tokio::test]
async fn browser_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "Mozilla/5.0 (WishlistTest)"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>Seen</title>"))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = MetadataExtractor::new(&scraper_config()).unwrap();
    let (name, _) = extractor.extract(Some(&server.uri()), None).await;
    assert_eq!(name.as_deref(), Some("Seen"));
}

#[tokio::test]
async fn slow_page_times_out_to_host() {
    let server = serve(
        "/slow",
        ResponseTemplate::new(200)
            .set_body_string("<title>Late</title>")
            .set_delay(Duration::from_secs(4)),
    )
    .await;
    let url = format!("{}/slow", server.uri());

    let extractor = MetadataExtractor::new(&ScraperConfig {
        timeout_secs: 1,
        ..scraper_config()
    })
    .unwrap();
    let outcome = extractor.extract_outcome(Some(&url), None).await;

    assert!(matches!(
        outcome,
        ExtractionOutcome::Fallback { failure: FetchError::Timeout(_), .. }
    ));
}

#[tokio::test]
async fn relative_image_resolves_against_origin() {
    let fetcher = MockFetcher::new().with_page(
        "https://x.com/page",
        r#"<html><head><title>Thing</title></head><body><img src="/img/a.png"></body></html>"#,
    );
    let extractor = MetadataExtractor::with_fetcher(fetcher.clone(), &scraper_config());

    let (name, thumb) = extractor.extract(Some("https://x.com/page"), None).await;
    assert_eq!(name.as_deref(), Some("Thing"));
    assert_eq!(thumb.as_deref(), Some("https://x.com/img/a.png"));

    let requests = fetcher.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].header("User-Agent"), Some("Mozilla/5.0 (WishlistTest)"));
    assert_eq!(requests[0].timeout, Duration::from_secs(2));
}

#[tokio::test]
async fn missing_url_skips_fetch() {
    let fetcher = MockFetcher::new();
    let extractor = MetadataExtractor::with_fetcher(fetcher.clone(), &scraper_config());

    let outcome = extractor.extract_outcome(Some("   "), Some("Socks")).await;
    assert!(matches!(outcome, ExtractionOutcome::Skipped { .. }));
    assert_eq!(outcome.into_parts(), (Some("Socks".to_string()), None));

    let (name, thumb) = extractor.extract(None, None).await;
    assert!(name.is_none() && thumb.is_none());
    assert!(fetcher.requests().await.is_empty());
}

#[tokio::test]
async fn explicit_name_survives_a_failed_fetch() {
    let fetcher = MockFetcher::new().with_response(
        "https://shop.test/item",
        Ok(FetchedPage {
            status: 500,
            body: String::new(),
        }),
    );
    let extractor = MetadataExtractor::with_fetcher(fetcher, &scraper_config());

    let (name, thumb) = extractor
        .extract(Some("https://shop.test/item"), Some("Blue Scarf"))
        .await;
    assert_eq!(name.as_deref(), Some("Blue Scarf"));
    assert!(thumb.is_none());
}

#[tokio::test]
async fn unparsable_url_uses_raw_url_as_name() {
    let extractor = MetadataExtractor::with_fetcher(MockFetcher::new(), &scraper_config());
    let (name, thumb) = extractor.extract(Some("shop.test/lamp"), None).await;
    assert_eq!(name.as_deref(), Some("shop.test/lamp"));
    assert!(thumb.is_none());
}

#[tokio::test]
async fn populate_fills_insert_candidate() {
    let fetcher = MockFetcher::new().with_page(
        "https://x.com/kettle",
        r#"<meta property="og:title" content="Kettle"><meta name="twitter:image" content="k.jpg">"#,
    );
    let extractor = MetadataExtractor::with_fetcher(fetcher, &scraper_config());

    let mut wish = NewWish::new(7, Some("https://x.com/kettle".into()), None);
    extractor.populate(&mut wish).await;

    assert_eq!(wish.display_name.as_deref(), Some("Kettle"));
    assert_eq!(wish.thumbnail_url.as_deref(), Some("https://x.com/k.jpg"));
    assert!(wish.validate().is_ok());
}

#[tokio::test]
#[traced_test]
async fn fallback_is_logged_with_url() {
    let extractor = MetadataExtractor::with_fetcher(MockFetcher::new(), &scraper_config());
    let _ = extractor.extract(Some("https://down.test/x"), None).await;
    assert!(logs_contain("metadata fetch failed"));
    assert!(logs_contain("down.test"));
}
