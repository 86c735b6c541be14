//! Database schema and repositories

pub mod clothing;
pub mod init;
pub mod migrations;
pub mod models;
pub mod outfits;
pub mod seed;
pub mod settings;

pub use clothing::ClothingRepository;
pub use init::*;
pub use migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};
pub use models::*;
pub use outfits::OutfitRepository;
pub use seed::{seed_if_empty, AssetResolver};
