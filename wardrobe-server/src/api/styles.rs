//! Style suggestions and outfit layout

use axum::Json;
use serde::Serialize;
use wardrobe_common::composer::{ACCESSORY_CATEGORIES, MAIN_CATEGORIES, STYLE_SUGGESTIONS};
use wardrobe_common::db::KNOWN_CATEGORIES;

#[derive(Debug, Serialize)]
pub struct StylesResponse {
    pub styles: Vec<&'static str>,
    pub main_categories: Vec<&'static str>,
    pub accessory_categories: Vec<&'static str>,
    pub known_categories: Vec<&'static str>,
}

/// GET /api/styles
pub async fn get_styles() -> Json<StylesResponse> {
    Json(StylesResponse {
        styles: STYLE_SUGGESTIONS.to_vec(),
        main_categories: MAIN_CATEGORIES.to_vec(),
        accessory_categories: ACCESSORY_CATEGORIES.to_vec(),
        known_categories: KNOWN_CATEGORIES.to_vec(),
    })
}
