//! Outfit endpoints
//!
//! Request bodies name a style and clothing ids. The ids are applied to an
//! [`OutfitComposer`] in order, so when two items share a category only the
//! later one ends up in the outfit.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;
use wardrobe_common::db::OutfitWithItems;
use wardrobe_common::OutfitComposer;

use super::ApiError;
use crate::AppState;

/// Body of outfit create/update requests
#[derive(Debug, Deserialize)]
pub struct OutfitRequest {
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub item_ids: Vec<i64>,
}

/// Apply a request to a composer, resolving ids to clothing rows
async fn compose(
    state: &AppState,
    mut composer: OutfitComposer,
    request: &OutfitRequest,
) -> Result<OutfitComposer, ApiError> {
    for id in &request.item_ids {
        let item = state
            .clothing
            .get(*id)
            .await?
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown clothing item: {}", id)))?;

        if let Some(replaced) = composer.select(item) {
            debug!(replaced = replaced.id, by = id, "Same category selected twice");
        }
    }
    composer.choose_style(request.style.as_str());
    Ok(composer)
}

async fn load_outfit(state: &AppState, id: i64) -> Result<OutfitWithItems, ApiError> {
    state
        .outfits
        .get_with_items(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("outfit {}", id)))
}

/// GET /api/outfits
///
/// Most recent first, each with its items.
pub async fn list_outfits(
    State(state): State<AppState>,
) -> Result<Json<Vec<OutfitWithItems>>, ApiError> {
    Ok(Json(state.outfits.list_all_with_items().await?))
}

/// GET /api/outfits/:id
pub async fn get_outfit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OutfitWithItems>, ApiError> {
    Ok(Json(load_outfit(&state, id).await?))
}

/// POST /api/outfits
pub async fn create_outfit(
    State(state): State<AppState>,
    Json(request): Json<OutfitRequest>,
) -> Result<(StatusCode, Json<OutfitWithItems>), ApiError> {
    let composer = compose(&state, OutfitComposer::new(), &request).await?;
    let id = state.outfits.save_composition(&composer).await?;

    Ok((StatusCode::CREATED, Json(load_outfit(&state, id).await?)))
}

/// PUT /api/outfits/:id
///
/// Replaces style and the whole item set.
pub async fn update_outfit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<OutfitRequest>,
) -> Result<Json<OutfitWithItems>, ApiError> {
    let composer = compose(&state, OutfitComposer::for_existing(id), &request).await?;
    state.outfits.save_composition(&composer).await?;

    Ok(Json(load_outfit(&state, id).await?))
}

/// DELETE /api/outfits/:id
pub async fn delete_outfit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.outfits.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("outfit {}", id)))
    }
}
