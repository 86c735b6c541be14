//! Integration tests for wardrobe-server API endpoints
//!
//! Each test builds the router over a fresh in-memory database and drives it
//! with `oneshot`. News tests point the client at a stub API served on an
//! ephemeral local port.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower::util::ServiceExt; // for `oneshot` method
use wardrobe_common::config::NewsConfig;
use wardrobe_common::db::init_memory_database;
use wardrobe_common::news::{Article, NewsCache, NewsClient, NewsFeed};
use wardrobe_server::{build_router, AppState};

/// Test helper: Serve a stub news API
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn news_stub(titles: &[&str]) -> SocketAddr {
    let results: Vec<Value> = titles
        .iter()
        .map(|t| json!({ "title": t, "link": format!("https://example.com/{}", t) }))
        .collect();
    let router = Router::new().route(
        "/api/1/news",
        get(move || {
            let results = results.clone();
            async move { Json(json!({ "status": "success", "results": results })) }
        }),
    );
    serve(router).await
}

async fn failing_news_stub() -> SocketAddr {
    let router = Router::new().route(
        "/api/1/news",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    serve(router).await
}

/// Test helper: Create state over a fresh database
async fn setup_state(news_addr: SocketAddr, cached: &[Article]) -> AppState {
    let pool = init_memory_database().await.expect("Should create database");

    let cache = NewsCache::new(pool.clone());
    if !cached.is_empty() {
        cache.store(cached).await.expect("Should seed news cache");
    }

    let client = NewsClient::new(NewsConfig {
        base_url: format!("http://{}/api/1/news", news_addr),
        api_key: Some("test-key".to_string()),
        timeout_secs: 5,
        ..NewsConfig::default()
    })
    .expect("Should build news client");

    AppState::new(pool, NewsFeed::new(client, cache))
}

async fn setup_app_with_news(news_addr: SocketAddr, cached: &[Article]) -> Router {
    build_router(setup_state(news_addr, cached).await)
}

async fn setup_app() -> Router {
    let addr = failing_news_stub().await;
    setup_app_with_news(addr, &[]).await
}

/// Test helper: Create request without body
fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Create request with JSON body
fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: Create a clothing item and return its id
async fn create_item(app: &Router, name: &str, category: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/clothing",
            json!({
                "name": name,
                "category": category,
                "image_uri": format!("file:///photos/{}.jpg", name),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    extract_json(response.into_body()).await["id"].as_i64().unwrap()
}

fn item_ids(outfit: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = outfit["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    ids
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "wardrobe-server");
    assert!(body["version"].is_string());
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_health_reports_unavailable_database() {
    let state = setup_state(failing_news_stub().await, &[]).await;
    state.db.close().await;
    let app = build_router(state);

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unavailable");
}

// =============================================================================
// Clothing
// =============================================================================

#[tokio::test]
async fn test_clothing_crud() {
    let app = setup_app().await;

    let id = create_item(&app, "Red Dress", "bodysuit").await;

    let response = app
        .clone()
        .oneshot(test_request("GET", &format!("/api/clothing/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Red Dress");
    assert_eq!(body["category"], "bodysuit");
    assert!(body["season"].is_null());

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/clothing/{}", id),
            json!({
                "name": "Red Dress",
                "category": "bodysuit",
                "season": "Summer",
                "material": "Silk",
                "color": "Red",
                "image_uri": "file:///photos/dress2.jpg",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["season"], "Summer");
    assert_eq!(body["image_uri"], "file:///photos/dress2.jpg");

    let response = app
        .clone()
        .oneshot(test_request("DELETE", &format!("/api/clothing/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(test_request("GET", &format!("/api/clothing/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clothing_requires_name_category_and_image() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/clothing",
            json!({ "name": "Mystery", "category": "top" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Please fill in all fields and select an image.");

    let response = app
        .oneshot(test_request("GET", "/api/clothing"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_clothing_list_filters_by_category() {
    let app = setup_app().await;

    create_item(&app, "Tee", "top").await;
    create_item(&app, "Jeans", "bottom").await;
    create_item(&app, "Blouse", "top").await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/clothing?category=top"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Tee", "Blouse"]);

    let response = app
        .oneshot(test_request("GET", "/api/clothing"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_missing_clothing_is_not_found() {
    let app = setup_app().await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/clothing/999",
            json!({ "name": "Ghost", "category": "top", "image_uri": "file:///g.jpg" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Outfits
// =============================================================================

#[tokio::test]
async fn test_create_outfit_keeps_latest_item_per_category() {
    let app = setup_app().await;

    let tee = create_item(&app, "Tee", "top").await;
    let blouse = create_item(&app, "Blouse", "top").await;
    let jeans = create_item(&app, "Jeans", "bottom").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/outfits",
            json!({ "style": "Casual", "item_ids": [tee, jeans, blouse] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["style"], "Casual");
    assert!(body["created_at"].is_string());
    assert_eq!(item_ids(&body), vec![blouse, jeans]);
}

#[tokio::test]
async fn test_create_outfit_rejects_missing_style_and_empty_selection() {
    let app = setup_app().await;
    let tee = create_item(&app, "Tee", "top").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/outfits",
            json!({ "style": "  ", "item_ids": [tee] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Please select a style before saving.");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/outfits",
            json!({ "style": "Formal", "item_ids": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Please select at least one clothing item.");

    let response = app
        .oneshot(test_request("GET", "/api/outfits"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_outfit_with_unknown_item_is_bad_request() {
    let app = setup_app().await;
    let tee = create_item(&app, "Tee", "top").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/outfits",
            json!({ "style": "Sport", "item_ids": [tee, 4242] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(test_request("GET", "/api/outfits"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_outfit_replaces_items() {
    let app = setup_app().await;

    let tee = create_item(&app, "Tee", "top").await;
    let jeans = create_item(&app, "Jeans", "bottom").await;
    let scarf = create_item(&app, "Scarf", "scarf").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/outfits",
            json!({ "style": "Casual", "item_ids": [tee, jeans] }),
        ))
        .await
        .unwrap();
    let created = extract_json(response.into_body()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/outfits/{}", id),
            json!({ "style": "Party", "item_ids": [tee, scarf] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["id"].as_i64(), Some(id));
    assert_eq!(body["style"], "Party");
    assert_eq!(item_ids(&body), vec![tee, scarf]);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/outfits/999",
            json!({ "style": "Party", "item_ids": [tee] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_clothing_removes_it_from_outfits() {
    let app = setup_app().await;

    let tee = create_item(&app, "Tee", "top").await;
    let jeans = create_item(&app, "Jeans", "bottom").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/outfits",
            json!({ "style": "Casual", "item_ids": [tee, jeans] }),
        ))
        .await
        .unwrap();
    let id = extract_json(response.into_body()).await["id"].as_i64().unwrap();

    app.clone()
        .oneshot(test_request("DELETE", &format!("/api/clothing/{}", jeans)))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(test_request("GET", &format!("/api/outfits/{}", id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(item_ids(&body), vec![tee]);

    let response = app
        .clone()
        .oneshot(test_request("DELETE", &format!("/api/outfits/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(test_request("DELETE", &format!("/api/outfits/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Styles
// =============================================================================

#[tokio::test]
async fn test_styles_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(test_request("GET", "/api/styles")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["styles"], json!(["Casual", "Formal", "Sport", "Party"]));
    assert_eq!(
        body["main_categories"],
        json!(["hat", "top", "bodysuit", "bottom", "shoes"])
    );
    assert_eq!(body["accessory_categories"], json!(["scarf", "jewelry", "bag"]));
}

// =============================================================================
// News
// =============================================================================

#[tokio::test]
async fn test_news_refresh_failure_keeps_cached_articles() {
    let addr = failing_news_stub().await;
    let app = setup_app_with_news(addr, &[Article::titled("Cached")]).await;

    let response = app.clone().oneshot(test_request("GET", "/api/news")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["articles"][0]["title"], "Cached");

    let response = app
        .oneshot(test_request("POST", "/api/news/refresh"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["updated"], false);
    assert_eq!(body["articles"][0]["title"], "Cached");
}

#[tokio::test]
async fn test_news_refresh_replaces_articles() {
    let addr = news_stub(&["Runway", "Street Style"]).await;
    let app = setup_app_with_news(addr, &[Article::titled("Old")]).await;

    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/news/refresh"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["updated"], true);
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);
    assert_eq!(body["articles"][0]["title"], "Runway");

    // The refreshed list was cached, so the next activation shows it
    let response = app.oneshot(test_request("GET", "/api/news")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["articles"][1]["title"], "Street Style");
}
