//! wardrobe-server library
//!
//! HTTP/JSON surface over the wardrobe catalogue, outfits and news feed.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use wardrobe_common::db::{ClothingRepository, OutfitRepository};
use wardrobe_common::news::NewsFeed;

pub mod api;
pub mod logging;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, pinged by the health check
    pub db: SqlitePool,
    pub clothing: ClothingRepository,
    pub outfits: OutfitRepository,
    pub news: NewsFeed,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, news: NewsFeed) -> Self {
        Self {
            clothing: ClothingRepository::new(db.clone()),
            outfits: OutfitRepository::new(db.clone()),
            db,
            news,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route(
            "/api/clothing",
            get(api::list_clothing).post(api::create_clothing),
        )
        .route(
            "/api/clothing/:id",
            get(api::get_clothing)
                .put(api::update_clothing)
                .delete(api::delete_clothing),
        )
        .route("/api/outfits", get(api::list_outfits).post(api::create_outfit))
        .route(
            "/api/outfits/:id",
            get(api::get_outfit)
                .put(api::update_outfit)
                .delete(api::delete_outfit),
        )
        .route("/api/styles", get(api::get_styles))
        .route("/api/news", get(api::get_news))
        .route("/api/news/refresh", post(api::refresh_news));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
