// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the request-handling pipeline: registration with
//! fuzzy matching, scraping on add, reservations, and cascading deletes.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wishlist::{Registration, WishService};
use wishlist_config::model::ScraperConfig;
use wishlist_core::{PersistenceSession, Priority, WishlistError};
use wishlist_metadata::{MetadataExtractor, ReqwestFetcher};
use wishlist_resilience::{HealthTracker, ResilientRunner, RetryPolicy};
use wishlist_storage::Database;
use wishlist_test_utils::MockFetcher;

async fn service_with<F: wishlist_core::PageFetcher>(
    dir: &TempDir,
    fetcher: F,
) -> WishService<F> {
    let db = Database::open_path(dir.path().join("e2e.db"), true)
        .await
        .unwrap();
    let runner = ResilientRunner::new(
        Arc::new(db),
        Arc::new(HealthTracker::new(Duration::from_secs(30), 3)),
        RetryPolicy::new(3, Duration::from_millis(10)),
    );
    let scraper = ScraperConfig {
        timeout_secs: 2,
        user_agent: "Mozilla/5.0 (E2E)".into(),
    };
    WishService::new(runner, MetadataExtractor::with_fetcher(fetcher, &scraper), 2)
}

async fn created(service: &WishService<impl wishlist_core::PageFetcher>, name: &str) -> i64 {
    match service.register(name, false).await.unwrap() {
        Registration::Created(user) => user.id,
        other => panic!("expected registration, got {other:?}"),
    }
}

#[tokio::test]
async fn similar_name_needs_confirmation() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, MockFetcher::new()).await;
    created(&service, "Alice").await;

    match service.register("Alise", false).await.unwrap() {
        Registration::NeedsConfirmation(similar) => {
            assert_eq!(similar.len(), 1);
            assert_eq!(similar[0].name, "Alice");
        }
        other => panic!("expected confirmation prompt, got {other:?}"),
    }
    assert!(matches!(
        service.register("Alise", true).await.unwrap(),
        Registration::Created(_)
    ));

    created(&service, "Zbigniew").await;
}

#[tokio::test]
async fn exact_duplicate_is_conflict() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, MockFetcher::new()).await;
    created(&service, "Alice").await;
    assert!(matches!(
        service.register("Alice", false).await.unwrap_err(),
        WishlistError::Conflict(_)
    ));
}

#[tokio::test]
async fn add_scrapes_live_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/teapot"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head>
                <meta property="og:title" content="Cast Iron Teapot">
                <meta property="og:image" content="/media/teapot.jpg">
            </head></html>"#,
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, ReqwestFetcher::new().unwrap()).await;
    created(&service, "Alice").await;

    let url = format!("{}/products/teapot", server.uri());
    let wish = service
        .add_wish("Alice", Some(url), None, Priority::MustHave)
        .await
        .unwrap();

    assert_eq!(wish.display_name.as_deref(), Some("Cast Iron Teapot"));
    assert_eq!(
        wish.thumbnail_url,
        Some(format!("{}/media/teapot.jpg", server.uri()))
    );
    assert_eq!(wish.priority, Priority::MustHave);
}

#[tokio::test]
async fn unreachable_url_still_stores_wish_named_after_host() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, MockFetcher::new()).await;
    created(&service, "Alice").await;

    let wish = service
        .add_wish(
            "Alice",
            Some("https://gone.example.org/item/9".into()),
            None,
            Priority::default(),
        )
        .await
        .unwrap();
    assert_eq!(wish.display_name.as_deref(), Some("gone.example.org"));
    assert!(wish.thumbnail_url.is_none());
}

#[tokio::test]
async fn wish_needs_url_or_name_and_known_owner() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, MockFetcher::new()).await;
    created(&service, "Alice").await;

    assert!(matches!(
        service.add_wish("Alice", None, None, Priority::Maybe).await.unwrap_err(),
        WishlistError::Validation(_)
    ));
    assert!(matches!(
        service
            .add_wish("Nobody", None, Some("Socks".into()), Priority::Maybe)
            .await
            .unwrap_err(),
        WishlistError::NotFound { entity: "user", .. }
    ));
}

#[tokio::test]
async fn reserve_release_and_cascade() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, MockFetcher::new()).await;
    created(&service, "Alice").await;
    created(&service, "Bob").await;

    let wish = service
        .add_wish("Alice", None, Some("Board game".into()), Priority::WouldBeNice)
        .await
        .unwrap();

    let reserved = service.reserve(wish.id, "Bob").await.unwrap();
    assert!(reserved.is_reserved());
    assert!(matches!(
        service.reserve(wish.id, "Alice").await.unwrap_err(),
        WishlistError::Validation(_)
    ));
    service.release(wish.id, "Bob").await.unwrap();

    let listing = service.list().await.unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].user.name, "Alice");
    assert_eq!(listing[0].wishes.len(), 1);
    assert!(listing[1].wishes.is_empty());

    service.delete_user("Alice").await.unwrap();
    let listing = service.list().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].user.name, "Bob");
}

#[tokio::test]
async fn only_owner_deletes_wish() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, MockFetcher::new()).await;
    created(&service, "Alice").await;
    created(&service, "Bob").await;
    let wish = service
        .add_wish("Alice", None, Some("Scarf".into()), Priority::Maybe)
        .await
        .unwrap();

    assert!(service.delete_wish(wish.id, "Bob").await.is_err());
    service.delete_wish(wish.id, "Alice").await.unwrap();
    assert!(service.list().await.unwrap()[0].wishes.is_empty());
}

#[tokio::test]
async fn registration_ignores_uncommitted_users() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, MockFetcher::new()).await;
    let db = service.database();

    db.begin().await.unwrap();
    db.execute("INSERT INTO users (name) VALUES ('Alice')").await.unwrap();
    let waited = tokio::time::timeout(
        Duration::from_millis(50),
        service.register("Alise", false),
    )
    .await;
    assert!(waited.is_err(), "registration read an open transaction");
    db.rollback().await.unwrap();

    // Without the rolled-back 'Alice' there is nothing similar.
    created(&service, "Alise").await;
}
