//! Bundled starter wardrobe
//!
//! Inserted once, the first time the clothing table is found empty.

use crate::Result;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;

/// One bundled clothing item
#[derive(Debug, Clone, Copy)]
pub struct SeedClothing {
    pub name: &'static str,
    pub category: &'static str,
    pub season: &'static str,
    pub material: &'static str,
    pub color: &'static str,
    /// File name of the bundled image, relative to the assets folder
    pub image: &'static str,
}

// Duplicate entries are intentional: the catalogue allows several
// identical garments.
pub const SEED_CLOTHING: &[SeedClothing] = &[
    SeedClothing { name: "White T-shirt", category: "top", season: "summer", material: "cotton", color: "white", image: "white_tshirt.png" },
    SeedClothing { name: "White T-shirt", category: "top", season: "summer", material: "cotton", color: "white", image: "white_tshirt.png" },
    SeedClothing { name: "Striped shirt", category: "top", season: "spring", material: "linen", color: "blue", image: "striped_shirt.png" },
    SeedClothing { name: "Blue jeans", category: "bottom", season: "all", material: "denim", color: "blue", image: "blue_jeans.png" },
    SeedClothing { name: "Black skirt", category: "bottom", season: "autumn", material: "wool", color: "black", image: "black_skirt.png" },
    SeedClothing { name: "Sneakers", category: "shoes", season: "all", material: "leather", color: "white", image: "sneakers.png" },
    SeedClothing { name: "Ankle boots", category: "shoes", season: "winter", material: "leather", color: "brown", image: "ankle_boots.png" },
    SeedClothing { name: "Black bodysuit", category: "bodysuit", season: "all", material: "elastane", color: "black", image: "black_bodysuit.png" },
    SeedClothing { name: "Tote bag", category: "bag", season: "all", material: "canvas", color: "beige", image: "tote_bag.png" },
    SeedClothing { name: "Bucket hat", category: "hat", season: "summer", material: "cotton", color: "green", image: "bucket_hat.png" },
    SeedClothing { name: "Silk scarf", category: "scarf", season: "spring", material: "silk", color: "red", image: "silk_scarf.png" },
    SeedClothing { name: "Gold necklace", category: "jewelry", season: "all", material: "gold", color: "gold", image: "gold_necklace.png" },
    SeedClothing { name: "Trench coat", category: "coat", season: "autumn", material: "cotton", color: "beige", image: "trench_coat.png" },
    SeedClothing { name: "Knit cardigan", category: "cardigan", season: "winter", material: "wool", color: "grey", image: "knit_cardigan.png" },
];

/// Turns bundled image names into URIs the catalogue can store
#[derive(Debug, Clone)]
pub struct AssetResolver {
    assets_dir: PathBuf,
}

impl AssetResolver {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// `file://` URI of a bundled image
    pub fn resolve(&self, image: &str) -> String {
        format!("file://{}", self.assets_dir.join(image).display())
    }
}

/// Insert the bundled dataset if the clothing table is empty
///
/// Returns the number of rows inserted (0 when the table already had rows).
pub async fn seed_if_empty(pool: &SqlitePool, resolver: &AssetResolver) -> Result<usize> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clothing")
        .fetch_one(&mut *tx)
        .await?;

    if existing > 0 {
        return Ok(0);
    }

    for seed in SEED_CLOTHING {
        sqlx::query(
            r#"
            INSERT INTO clothing (name, category, season, material, color, imageUri)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(seed.name)
        .bind(seed.category)
        .bind(seed.season)
        .bind(seed.material)
        .bind(seed.color)
        .bind(resolver.resolve(seed.image))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!("Seeded {} clothing items", SEED_CLOTHING.len());
    Ok(SEED_CLOTHING.len())
}
