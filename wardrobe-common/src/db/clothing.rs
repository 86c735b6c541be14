//! Clothing database access

use crate::db::models::{ClothingAttributes, ClothingItem};
use crate::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

const SELECT_CLOTHING: &str =
    "SELECT id, name, category, season, material, color, imageUri FROM clothing";

/// Repository for catalogued clothing items
#[derive(Clone)]
pub struct ClothingRepository {
    pool: SqlitePool,
}

impl ClothingRepository {
    /// Create new repository with database pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All clothing rows in insertion order
    pub async fn list_all(&self) -> Result<Vec<ClothingItem>> {
        let rows = sqlx::query(&format!("{} ORDER BY id", SELECT_CLOTHING))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(ClothingItem::from_row).collect()
    }

    /// Clothing rows of one category, in insertion order
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<ClothingItem>> {
        let rows = sqlx::query(&format!("{} WHERE category = ? ORDER BY id", SELECT_CLOTHING))
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(ClothingItem::from_row).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<ClothingItem>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_CLOTHING))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(ClothingItem::from_row).transpose()
    }

    /// Insert a clothing item, returning its new id
    pub async fn insert(&self, attrs: &ClothingAttributes) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO clothing (name, category, season, material, color, imageUri)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&attrs.name)
        .bind(&attrs.category)
        .bind(&attrs.season)
        .bind(&attrs.material)
        .bind(&attrs.color)
        .bind(&attrs.image_uri)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(clothing_id = id, category = %attrs.category, "Inserted clothing item");
        Ok(id)
    }

    /// Overwrite every mutable field of an item
    ///
    /// Returns `false` without error when no row has this id.
    pub async fn update(&self, id: i64, attrs: &ClothingAttributes) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE clothing
            SET name = ?, category = ?, season = ?, material = ?, color = ?, imageUri = ?
            WHERE id = ?
            "#,
        )
        .bind(&attrs.name)
        .bind(&attrs.category)
        .bind(&attrs.season)
        .bind(&attrs.material)
        .bind(&attrs.color)
        .bind(&attrs.image_uri)
        .bind(id)
        .execute(&self.pool)
        .await?;

        let updated = result.rows_affected() > 0;
        debug!(clothing_id = id, updated, "Updated clothing item");
        Ok(updated)
    }

    /// Delete an item; its outfit links go with it (ON DELETE CASCADE)
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clothing WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(clothing_id = id, "Deleted clothing item");
        }
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clothing")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
