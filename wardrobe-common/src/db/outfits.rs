//! Outfit database access
//!
//! An outfit's clothing is defined only by its `outfit_clothing` rows.
//! Writes that touch an outfit and its links run in one transaction, so a
//! failure part way through leaves the database as it was.

use crate::composer::OutfitComposer;
use crate::db::models::{ClothingItem, Outfit, OutfitWithItems};
use crate::{time, Error, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashSet;
use tracing::{debug, info};

/// Repository for outfits and their clothing links
#[derive(Clone)]
pub struct OutfitRepository {
    pool: SqlitePool,
}

impl OutfitRepository {
    /// Create new repository with database pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All outfits, most recent first
    pub async fn list_all(&self) -> Result<Vec<Outfit>> {
        let rows = sqlx::query(
            "SELECT id, style, createdAt FROM outfits ORDER BY createdAt DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Outfit::from_row).collect()
    }

    /// All outfits with their items, most recent first
    pub async fn list_all_with_items(&self) -> Result<Vec<OutfitWithItems>> {
        let outfits = self.list_all().await?;
        let mut result = Vec::with_capacity(outfits.len());

        for outfit in outfits {
            let items = self.items_for(outfit.id).await?;
            result.push(OutfitWithItems { outfit, items });
        }

        Ok(result)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Outfit>> {
        let row = sqlx::query("SELECT id, style, createdAt FROM outfits WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Outfit::from_row).transpose()
    }

    /// One outfit joined with its clothing items
    pub async fn get_with_items(&self, id: i64) -> Result<Option<OutfitWithItems>> {
        let Some(outfit) = self.get(id).await? else {
            return Ok(None);
        };

        let items = self.items_for(id).await?;
        Ok(Some(OutfitWithItems { outfit, items }))
    }

    async fn items_for(&self, outfit_id: i64) -> Result<Vec<ClothingItem>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.category, c.season, c.material, c.color, c.imageUri
            FROM outfit_clothing oc
            JOIN clothing c ON c.id = oc.clothingId
            WHERE oc.outfitId = ?
            ORDER BY oc.id
            "#,
        )
        .bind(outfit_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(ClothingItem::from_row).collect()
    }

    /// Create an outfit linked to `item_ids`
    ///
    /// The outfit row and every link are written in one transaction. An
    /// unknown clothing id violates the foreign key and nothing is kept.
    pub async fn create(&self, style: &str, item_ids: &[i64]) -> Result<i64> {
        let created_at = time::now_iso8601();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO outfits (style, createdAt) VALUES (?, ?)")
            .bind(style)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        let outfit_id = result.last_insert_rowid();

        let linked = insert_links(&mut tx, outfit_id, item_ids).await?;

        tx.commit().await?;

        info!(outfit_id, style, items = linked, "Created outfit");
        Ok(outfit_id)
    }

    /// Replace an outfit's style, timestamp and full item set
    ///
    /// Returns `false` when no outfit has this id.
    pub async fn replace(&self, id: i64, style: &str, item_ids: &[i64]) -> Result<bool> {
        let created_at = time::now_iso8601();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE outfits SET style = ?, createdAt = ? WHERE id = ?")
            .bind(style)
            .bind(&created_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        let removed = sqlx::query("DELETE FROM outfit_clothing WHERE outfitId = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let linked = insert_links(&mut tx, id, item_ids).await?;

        tx.commit().await?;

        info!(outfit_id = id, style, removed, linked, "Replaced outfit");
        Ok(true)
    }

    /// Delete an outfit; its links go with it (ON DELETE CASCADE)
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM outfits WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(outfit_id = id, "Deleted outfit");
        }
        Ok(deleted)
    }

    /// Persist the composer's selection
    ///
    /// The composer's save precondition is checked first; a rejected
    /// composition never reaches the database. A composer opened from an
    /// existing outfit replaces it, otherwise a new outfit is created.
    pub async fn save_composition(&self, composer: &OutfitComposer) -> Result<i64> {
        let composed = composer.validate()?;

        match composer.editing() {
            Some(id) => {
                if self.replace(id, &composed.style, &composed.item_ids).await? {
                    Ok(id)
                } else {
                    Err(Error::NotFound(format!("outfit {}", id)))
                }
            }
            None => self.create(&composed.style, &composed.item_ids).await,
        }
    }
}

/// Insert one link per distinct clothing id, in the given order
async fn insert_links(
    tx: &mut Transaction<'_, Sqlite>,
    outfit_id: i64,
    item_ids: &[i64],
) -> Result<usize> {
    let mut seen = HashSet::with_capacity(item_ids.len());
    let mut linked = 0usize;

    for clothing_id in item_ids {
        if !seen.insert(*clothing_id) {
            continue;
        }

        sqlx::query("INSERT INTO outfit_clothing (outfitId, clothingId) VALUES (?, ?)")
            .bind(outfit_id)
            .bind(clothing_id)
            .execute(&mut **tx)
            .await?;

        linked += 1;
        debug!(outfit_id, clothing_id, "Linked clothing to outfit");
    }

    Ok(linked)
}
