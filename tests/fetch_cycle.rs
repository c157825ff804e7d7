//! End-to-end fetch cycle: filter changes drive requests through the
//! background tasks and their results land back in `App`.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use storefront::app::{App, AppEvent, DetailState};
use storefront::catalog::CatalogClient;
use storefront::ui::{
    spawn_category_fetch, spawn_page_fetch, spawn_product_fetch, sync_page_fetch,
};
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> App {
    let client =
        CatalogClient::new(Url::parse(&server.uri()).unwrap(), Duration::from_secs(5)).unwrap();
    App::new(client, vec!["Apple".to_string()])
}

fn products(ids: std::ops::RangeInclusive<u64>) -> serde_json::Value {
    let items: Vec<_> = ids
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Product {}", id),
                "category": if id % 2 == 0 { "beauty" } else { "groceries" },
                "price": id as f64,
                "rating": 4.0,
            })
        })
        .collect();
    json!(items)
}

/// Receive the next event and apply it the way the event loop does.
async fn pump(app: &mut App, rx: &mut mpsc::Receiver<AppEvent>) -> bool {
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event arrives")
        .expect("channel open");
    match event {
        AppEvent::PageLoaded {
            generation,
            request,
            result,
        } => app.apply_page_result(generation, &request, result),
        AppEvent::CategoriesLoaded(result) => {
            app.apply_categories(result);
            true
        }
        AppEvent::ProductLoaded {
            product_id,
            generation,
            result,
        } => app.apply_detail_result(product_id, generation, result),
        AppEvent::TaskPanicked { task, error } => panic!("{} panicked: {}", task, error),
    }
}

#[tokio::test]
async fn search_from_page_three_resets_to_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": products(1..=12),
            "total": 194
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("skip", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": products(25..=36),
            "total": 194
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .and(query_param("skip", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": products(100..=111),
            "total": 40
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": products(200..=211),
            "total": 40
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    let (tx, mut rx) = mpsc::channel(8);

    // Initial listing
    assert!(sync_page_fetch(&mut app, &tx));
    assert!(pump(&mut app, &mut rx).await);
    assert_eq!(app.total_pages(), 17);

    // Move to page 3
    assert!(app.go_to_page(3));
    assert!(sync_page_fetch(&mut app, &tx));
    assert!(pump(&mut app, &mut rx).await);
    assert_eq!(app.page.products[0].id, 25);

    // Search while on page 3: skip=24, then back to page 1
    app.filters.set_search_query("phone");
    assert!(sync_page_fetch(&mut app, &tx));
    assert!(pump(&mut app, &mut rx).await);
    assert_eq!(app.current_page, 1);
    assert_eq!(app.page.products[0].id, 100);

    // The page change triggers the skip=0 search
    assert!(sync_page_fetch(&mut app, &tx));
    assert!(pump(&mut app, &mut rx).await);
    assert_eq!(app.page.products[0].id, 200);
    assert!(!sync_page_fetch(&mut app, &tx));
}

#[tokio::test]
async fn keyword_is_used_when_search_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "Apple"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": products(1..=3),
            "total": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    app.filters.set_keyword("Apple");
    let (tx, mut rx) = mpsc::channel(8);
    assert!(sync_page_fetch(&mut app, &tx));
    assert!(pump(&mut app, &mut rx).await);
    assert_eq!(app.page.total, 3);
    assert_eq!(app.total_pages(), 1);
}

#[tokio::test]
async fn superseded_response_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "products": products(1..=12), "total": 194 }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": products(50..=51),
            "total": 2
        })))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    let (tx, mut rx) = mpsc::channel(8);

    // Slow listing, then a fast search before it returns
    let (stale_generation, stale_request) = app.begin_page_fetch().unwrap();
    let stale = spawn_page_fetch(
        app.client.clone(),
        stale_generation,
        stale_request,
        tx.clone(),
    );

    app.filters.set_search_query("lamp");
    assert!(sync_page_fetch(&mut app, &tx));

    // Only the fresh search is applied, whatever the arrival order
    while !pump(&mut app, &mut rx).await {}
    assert_eq!(app.page.total, 2);

    let _ = stale.await;
    while let Ok(event) = rx.try_recv() {
        if let AppEvent::PageLoaded {
            generation,
            request,
            result,
        } = event
        {
            assert!(!app.apply_page_result(generation, &request, result));
        }
    }
    assert_eq!(app.page.total, 2);
}

#[tokio::test]
async fn failed_listing_leaves_page_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    let (tx, mut rx) = mpsc::channel(8);
    assert!(sync_page_fetch(&mut app, &tx));
    assert!(pump(&mut app, &mut rx).await);
    assert!(app.page.products.is_empty());
    assert!(!app.page_loading);
    assert!(app.status_message.is_none());
}

#[tokio::test]
async fn categories_load_in_first_seen_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": products(1..=5),
            "total": 5
        })))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    let (tx, mut rx) = mpsc::channel(8);
    spawn_category_fetch(app.client.clone(), tx);
    pump(&mut app, &mut rx).await;
    assert_eq!(app.categories, vec!["groceries", "beauty"]);
}

#[tokio::test]
async fn detail_fetch_loads_product() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "title": "Red Lipstick",
            "price": 12.99
        })))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    let (tx, mut rx) = mpsc::channel(8);
    let generation = app.begin_detail_fetch(4);
    spawn_product_fetch(app.client.clone(), 4, generation, tx);
    assert!(pump(&mut app, &mut rx).await);
    match &app.detail {
        DetailState::Loaded(product) => assert_eq!(product.title, "Red Lipstick"),
        other => panic!("unexpected detail state: {:?}", other),
    }
}

#[tokio::test]
async fn detail_with_fractional_review_rating_loads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11,
            "title": "Desk Lamp",
            "price": 24.5,
            "reviews": [{ "rating": 3.5, "comment": "Fine", "reviewerName": "Kai" }]
        })))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    let (tx, mut rx) = mpsc::channel(8);
    let generation = app.begin_detail_fetch(11);
    spawn_product_fetch(app.client.clone(), 11, generation, tx);
    assert!(pump(&mut app, &mut rx).await);
    match &app.detail {
        DetailState::Loaded(product) => assert_eq!(product.reviews[0].rating, 3.5),
        other => panic!("unexpected detail state: {:?}", other),
    }
}

#[tokio::test]
async fn failed_detail_fetch_keeps_loading() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    let (tx, mut rx) = mpsc::channel(8);
    let generation = app.begin_detail_fetch(9);
    spawn_product_fetch(app.client.clone(), 9, generation, tx);
    pump(&mut app, &mut rx).await;
    assert_eq!(app.detail, DetailState::Loading { product_id: 9 });
}
