//! # Wardrobe Common Library
//!
//! Shared code for the wardrobe service including:
//! - Database schema, migrations and seed data
//! - Clothing and outfit repositories
//! - Outfit composer (selection state used before saving an outfit)
//! - Fashion news client and its local cache
//! - Configuration loading

pub mod composer;
pub mod config;
pub mod db;
pub mod error;
pub mod news;
pub mod time;

pub use composer::OutfitComposer;
pub use error::{Error, Result};
