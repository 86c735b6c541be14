//! Fashion news endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use wardrobe_common::news::{Article, RefreshOutcome};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub updated: bool,
    pub articles: Vec<Article>,
}

/// GET /api/news
///
/// Answers with the cached list; a fresh fetch continues in the background
/// and is visible on the next request.
pub async fn get_news(State(state): State<AppState>) -> Json<NewsResponse> {
    let (articles, _refresh) = state.news.activate().await;
    Json(NewsResponse { articles })
}

/// POST /api/news/refresh
///
/// Waits for a fetch. A failed fetch is not an error: the previous list is
/// returned with `updated: false`.
pub async fn refresh_news(State(state): State<AppState>) -> Json<RefreshResponse> {
    let outcome = state.news.refresh().await;
    Json(RefreshResponse {
        updated: matches!(outcome, RefreshOutcome::Updated { .. }),
        articles: state.news.articles().await,
    })
}
