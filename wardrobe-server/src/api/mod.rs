//! HTTP API handlers for wardrobe-server

pub mod clothing;
pub mod error;
pub mod health;
pub mod news;
pub mod outfits;
pub mod styles;

pub use clothing::{create_clothing, delete_clothing, get_clothing, list_clothing, update_clothing};
pub use error::ApiError;
pub use health::health_routes;
pub use news::{get_news, refresh_news};
pub use outfits::{create_outfit, delete_outfit, get_outfit, list_outfits, update_outfit};
pub use styles::get_styles;
