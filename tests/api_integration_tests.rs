//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use item_cache::{
    api::create_router,
    catalog::ProductCatalog,
    models::ProductRecord,
    tasks::sync_fn,
    AppState, CacheConfig, ItemCache,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn seeded_catalog() -> Arc<ProductCatalog> {
    Arc::new(ProductCatalog::with_products([
        ProductRecord::new(13860428, "The Big Lebowski (Blu-ray)", 13.49, "USD"),
        ProductRecord::new(54456119, "Creamy Peanut Butter 40oz", 2.99, "USD"),
    ]))
}

fn create_test_app(config: CacheConfig) -> (Router, AppState) {
    let state = AppState::new(ItemCache::new(&config), seeded_catalog());
    (create_router(state.clone()), state)
}

fn default_app() -> Router {
    create_test_app(CacheConfig::default()).0
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_product_from_catalog() {
    let app = default_app();

    let response = app.oneshot(get("/product/13860428")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], 13860428);
    assert_eq!(json["name"], "The Big Lebowski (Blu-ray)");
    assert_eq!(json["current_price"]["currency_code"], "USD");
}

#[tokio::test]
async fn test_get_product_not_found() {
    let app = default_app();

    let response = app.oneshot(get("/product/1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("1"));
}

#[tokio::test]
async fn test_get_product_bad_id() {
    let app = default_app();

    let response = app.oneshot(get("/product/not-a-number")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_repeated_get_is_served_from_cache() {
    let (app, _) = create_test_app(CacheConfig::default());

    for _ in 0..3 {
        let response = app.clone().oneshot(get("/product/54456119")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["misses"], 1);
    assert_eq!(json["hits"], 2);
    assert_eq!(json["total_entries"], 1);
}

// == PUT Endpoint Tests ==

#[tokio::test]
async fn test_put_then_get_round_trip() {
    let (app, _) = create_test_app(CacheConfig::default());

    let response = app
        .clone()
        .oneshot(put(
            "/product/13860428",
            r#"{"name":"The Big Lebowski (Blu-ray)","current_price":{"value":11.99,"currency_code":"USD"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/product/13860428")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["current_price"]["value"], 11.99);
}

#[tokio::test]
async fn test_put_invalid_json() {
    let app = default_app();

    let response = app
        .oneshot(put("/product/1", "not valid json"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_put_invalid_currency() {
    let app = default_app();

    let response = app
        .oneshot(put(
            "/product/1",
            r#"{"name":"kettle","current_price":{"value":5.0,"currency_code":"dollars"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Currency code"));
}

// == Capacity & Lifecycle Tests ==

#[tokio::test]
async fn test_capacity_evicts_least_recently_touched() {
    let (app, state) = create_test_app(CacheConfig {
        max_items: 3,
        ..CacheConfig::default()
    });

    for id in 1..=3 {
        let body = format!(
            r#"{{"name":"item {}","current_price":{{"value":1.0,"currency_code":"USD"}}}}"#,
            id
        );
        let uri = format!("/product/{}", id);
        app.clone().oneshot(put(&uri, &body)).await.unwrap();
    }
    app.clone().oneshot(get("/product/1")).await.unwrap();
    app.clone()
        .oneshot(put(
            "/product/4",
            r#"{"name":"item 4","current_price":{"value":1.0,"currency_code":"USD"}}"#,
        ))
        .await
        .unwrap();

    let cache = state.cache.as_ref().unwrap();
    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.total_entries, 3);
    assert_eq!(stats.evictions, 1);

    // Product 2 was evicted from the cache but is still in the catalog
    let response = app.oneshot(get("/product/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache.stats().await.unwrap().misses, 1);
}

#[tokio::test]
async fn test_shutdown_returns_service_unavailable() {
    let (app, state) = create_test_app(CacheConfig::default());
    state.shutdown().await;

    let response = app.oneshot(get("/product/13860428")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test(start_paused = true)]
async fn test_sync_picks_up_catalog_changes() {
    let catalog = seeded_catalog();
    let source = catalog.clone();
    let refresh = sync_fn(move |id| {
        let source = source.clone();
        async move { source.fetch(id).await.map_err(anyhow::Error::from) }
    });
    let state = AppState::new(ItemCache::with_sync(&CacheConfig::default(), refresh), catalog);
    let app = create_router(state.clone());

    app.clone().oneshot(get("/product/54456119")).await.unwrap();

    // Price changes behind the cache's back
    state
        .catalog
        .upsert(ProductRecord::new(54456119, "Creamy Peanut Butter 40oz", 3.49, "USD"))
        .await;
    let response = app.clone().oneshot(get("/product/54456119")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["current_price"]["value"], 2.99);

    tokio::time::sleep(Duration::from_secs(31 * 60)).await;

    let response = app.oneshot(get("/product/54456119")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["current_price"]["value"], 3.49);
}

// == Stats & Health Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = default_app();

    let response = app.oneshot(get("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache_enabled"], true);
    assert_eq!(json["hits"], 0);
    assert_eq!(json["hit_rate"], 0.0);
}

#[tokio::test]
async fn test_disabled_cache_stats() {
    let app = create_router(AppState::without_cache(seeded_catalog()));

    let response = app.clone().oneshot(get("/product/13860428")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache_enabled"], false);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = default_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
