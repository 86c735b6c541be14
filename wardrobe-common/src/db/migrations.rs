//! Database schema migrations
//!
//! Versioned, idempotent upgrades tracked in the `schema_version` table.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - users may upgrade from any older version
//! 2. **Always add new migrations** - one function per schema change
//! 3. **Check before altering** - a migration must be a no-op on an already-current schema

use crate::Result;
use serde_json::Value;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }

    Ok(())
}

/// Migration v1: move outfit items out of the legacy JSON column
///
/// Early databases stored each outfit's clothing as a JSON array in an
/// `outfits.items` column. Each element's `id` that still names a clothing
/// row becomes an `outfit_clothing` link; unknown ids are dropped. The
/// column is removed afterwards. Runs as one transaction.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v1: normalize legacy outfit items");

    let has_column: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info('outfits') WHERE name = 'items'",
    )
    .fetch_one(pool)
    .await?;

    if has_column == 0 {
        info!("  outfits.items column not present - skipping");
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    let rows: Vec<(i64, Option<String>)> = sqlx::query_as("SELECT id, items FROM outfits")
        .fetch_all(&mut *tx)
        .await?;

    let mut linked = 0usize;
    for (outfit_id, items) in rows {
        let ids = legacy_item_ids(outfit_id, items.as_deref());
        linked += link_existing_items(&mut tx, outfit_id, &ids).await?;
    }

    sqlx::query("ALTER TABLE outfits DROP COLUMN items")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("  ✓ Moved {} legacy outfit items into outfit_clothing", linked);
    Ok(())
}

/// Extract clothing ids from a legacy `items` JSON blob
fn legacy_item_ids(outfit_id: i64, items: Option<&str>) -> Vec<i64> {
    let Some(raw) = items else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_i64))
            .collect(),
        Ok(_) | Err(_) => {
            warn!(outfit_id, "Unreadable legacy items value, outfit left without items");
            Vec::new()
        }
    }
}

async fn link_existing_items(
    tx: &mut Transaction<'_, Sqlite>,
    outfit_id: i64,
    clothing_ids: &[i64],
) -> Result<usize> {
    let mut linked = 0usize;

    for clothing_id in clothing_ids {
        let result = sqlx::query(
            r#"
            INSERT INTO outfit_clothing (outfitId, clothingId)
            SELECT ?, id FROM clothing WHERE id = ?
            "#,
        )
        .bind(outfit_id)
        .bind(clothing_id)
        .execute(&mut **tx)
        .await?;

        linked += result.rows_affected() as usize;
    }

    Ok(linked)
}
