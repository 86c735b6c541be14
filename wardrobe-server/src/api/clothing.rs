//! Clothing catalogue endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use wardrobe_common::db::{ClothingDraft, ClothingItem};

use super::ApiError;
use crate::AppState;

/// Query parameters for the clothing list
#[derive(Debug, Deserialize)]
pub struct ClothingFilter {
    /// Only items of this category
    pub category: Option<String>,
}

/// GET /api/clothing[?category=top]
pub async fn list_clothing(
    State(state): State<AppState>,
    Query(filter): Query<ClothingFilter>,
) -> Result<Json<Vec<ClothingItem>>, ApiError> {
    let items = match filter.category {
        Some(category) => state.clothing.list_by_category(&category).await?,
        None => state.clothing.list_all().await?,
    };
    Ok(Json(items))
}

/// GET /api/clothing/:id
pub async fn get_clothing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClothingItem>, ApiError> {
    state
        .clothing
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("clothing item {}", id)))
}

/// POST /api/clothing
///
/// Name, category and image are required.
pub async fn create_clothing(
    State(state): State<AppState>,
    Json(draft): Json<ClothingDraft>,
) -> Result<(StatusCode, Json<ClothingItem>), ApiError> {
    let attrs = draft.validate()?;
    let id = state.clothing.insert(&attrs).await?;

    let item = state
        .clothing
        .get(id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("clothing item {} vanished after insert", id)))?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/clothing/:id
///
/// Overwrites every field of the item.
pub async fn update_clothing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ClothingDraft>,
) -> Result<Json<ClothingItem>, ApiError> {
    let attrs = draft.validate()?;

    if !state.clothing.update(id, &attrs).await? {
        return Err(ApiError::NotFound(format!("clothing item {}", id)));
    }

    get_clothing(State(state), Path(id)).await
}

/// DELETE /api/clothing/:id
///
/// Also removes the item from every outfit.
pub async fn delete_clothing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.clothing.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("clothing item {}", id)))
    }
}
