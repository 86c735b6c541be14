//! Database models

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Categories the composer knows how to place
pub const KNOWN_CATEGORIES: [&str; 10] = [
    "top", "bottom", "shoes", "bodysuit", "bag", "hat", "scarf", "jewelry", "coat", "cardigan",
];

/// A catalogued garment or accessory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: i64,
    pub name: String,
    /// Free text; the store accepts any value
    pub category: String,
    pub season: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub image_uri: Option<String>,
}

impl ClothingItem {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
            category: row.try_get::<Option<String>, _>("category")?.unwrap_or_default(),
            season: row.try_get("season")?,
            material: row.try_get("material")?,
            color: row.try_get("color")?,
            image_uri: row.try_get("imageUri")?,
        })
    }

    /// Mutable attributes of this item
    pub fn attributes(&self) -> ClothingAttributes {
        ClothingAttributes {
            name: self.name.clone(),
            category: self.category.clone(),
            season: self.season.clone(),
            material: self.material.clone(),
            color: self.color.clone(),
            image_uri: self.image_uri.clone(),
        }
    }
}

/// Every mutable column of a clothing row
///
/// Accepted by the repository as-is; use [`ClothingDraft::validate`] to
/// build one from user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingAttributes {
    pub name: String,
    pub category: String,
    pub season: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub image_uri: Option<String>,
}

/// Raw clothing form input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClothingDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
}

impl ClothingDraft {
    /// Check required fields and trim values
    ///
    /// Name and category must be non-blank and an image must be attached.
    /// Blank optional fields are stored as NULL.
    pub fn validate(&self) -> Result<ClothingAttributes> {
        let name = self.name.trim();
        let category = self.category.trim();
        let image_uri = trimmed(&self.image_uri);

        if name.is_empty() || category.is_empty() || image_uri.is_none() {
            return Err(Error::Validation(
                "Please fill in all fields and select an image.".to_string(),
            ));
        }

        Ok(ClothingAttributes {
            name: name.to_string(),
            category: category.to_string(),
            season: trimmed(&self.season),
            material: trimmed(&self.material),
            color: trimmed(&self.color),
            image_uri,
        })
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A saved outfit without its items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub id: i64,
    pub style: String,
    /// ISO 8601, see [`crate::time::now_iso8601`]
    pub created_at: String,
}

impl Outfit {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            style: row.try_get::<Option<String>, _>("style")?.unwrap_or_default(),
            created_at: row.try_get::<Option<String>, _>("createdAt")?.unwrap_or_default(),
        })
    }
}

/// An outfit together with the clothing linked to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitWithItems {
    #[serde(flatten)]
    pub outfit: Outfit,
    pub items: Vec<ClothingItem>,
}

impl OutfitWithItems {
    pub fn item_ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.id).collect()
    }
}
