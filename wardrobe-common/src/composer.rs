//! Outfit composer
//!
//! Transient selection state used while building or editing an outfit.
//! At most one clothing item is selected per category; selecting another
//! item of the same category replaces the previous one. The composer is
//! handed to [`OutfitRepository::save_composition`] by reference.
//!
//! One-item-per-category is enforced here and not in the database: the
//! association table accepts any combination of items.
//!
//! [`OutfitRepository::save_composition`]: crate::db::OutfitRepository::save_composition

use crate::db::models::{ClothingItem, OutfitWithItems};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Style labels offered to the user (any label is accepted)
pub const STYLE_SUGGESTIONS: [&str; 4] = ["Casual", "Formal", "Sport", "Party"];

/// Categories shown in the main column, top to bottom
pub const MAIN_CATEGORIES: [&str; 5] = ["hat", "top", "bodysuit", "bottom", "shoes"];

/// Categories shown in the accessory row
pub const ACCESSORY_CATEGORIES: [&str; 3] = ["scarf", "jewelry", "bag"];

pub const MISSING_STYLE_MESSAGE: &str = "Please select a style before saving.";
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one clothing item.";

/// Selection that passed the save precondition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedOutfit {
    pub style: String,
    pub item_ids: Vec<i64>,
}

/// One category position in the outfit layout
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub category: &'static str,
    pub item: Option<&'a ClothingItem>,
}

/// Selected items arranged for display
#[derive(Debug, Clone)]
pub struct OutfitLayout<'a> {
    pub main: Vec<Slot<'a>>,
    pub accessories: Vec<Slot<'a>>,
    /// Selected items whose category has no fixed position
    pub other: Vec<&'a ClothingItem>,
}

#[derive(Debug, Clone, Default)]
pub struct OutfitComposer {
    selected: BTreeMap<String, ClothingItem>,
    style: Option<String>,
    editing: Option<i64>,
}

impl OutfitComposer {
    /// Empty composer for a new outfit
    pub fn new() -> Self {
        Self::default()
    }

    /// Composer pre-filled from a saved outfit
    ///
    /// Items are selected in stored order, so if the stored outfit holds
    /// two items of one category only the later one stays selected.
    pub fn from_outfit(outfit: OutfitWithItems) -> Self {
        let mut composer = Self {
            selected: BTreeMap::new(),
            style: Some(outfit.outfit.style),
            editing: Some(outfit.outfit.id),
        };
        for item in outfit.items {
            composer.select(item);
        }
        composer
    }

    /// Empty composer whose save replaces the outfit `outfit_id`
    pub fn for_existing(outfit_id: i64) -> Self {
        Self {
            editing: Some(outfit_id),
            ..Self::default()
        }
    }

    /// Id of the saved outfit being edited, if any
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Select an item, replacing any item already selected for its category
    ///
    /// Returns the replaced item.
    pub fn select(&mut self, item: ClothingItem) -> Option<ClothingItem> {
        self.selected.insert(item.category.clone(), item)
    }

    /// Remove the item with this id from the selection
    pub fn deselect(&mut self, item_id: i64) -> Option<ClothingItem> {
        let category = self
            .selected
            .iter()
            .find(|(_, item)| item.id == item_id)
            .map(|(category, _)| category.clone())?;
        self.selected.remove(&category)
    }

    pub fn choose_style(&mut self, style: impl Into<String>) {
        self.style = Some(style.into());
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn item_for(&self, category: &str) -> Option<&ClothingItem> {
        self.selected.get(category)
    }

    pub fn is_selected(&self, item_id: i64) -> bool {
        self.selected.values().any(|item| item.id == item_id)
    }

    pub fn selected_items(&self) -> impl Iterator<Item = &ClothingItem> {
        self.selected.values()
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        self.selected.values().map(|item| item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Save precondition: a non-blank style and at least one item
    pub fn validate(&self) -> Result<ComposedOutfit> {
        let style = self.style.as_deref().map(str::trim).unwrap_or_default();
        if style.is_empty() {
            return Err(Error::Validation(MISSING_STYLE_MESSAGE.to_string()));
        }
        if self.selected.is_empty() {
            return Err(Error::Validation(EMPTY_SELECTION_MESSAGE.to_string()));
        }

        Ok(ComposedOutfit {
            style: style.to_string(),
            item_ids: self.selected_ids(),
        })
    }

    /// Arrange the selection into main column, accessory row and the rest
    pub fn layout(&self) -> OutfitLayout<'_> {
        let slot = |category: &'static str| Slot {
            category,
            item: self.selected.get(category),
        };

        let other = self
            .selected
            .iter()
            .filter(|(category, _)| {
                !MAIN_CATEGORIES.contains(&category.as_str())
                    && !ACCESSORY_CATEGORIES.contains(&category.as_str())
            })
            .map(|(_, item)| item)
            .collect();

        OutfitLayout {
            main: MAIN_CATEGORIES.iter().map(|c| slot(*c)).collect(),
            accessories: ACCESSORY_CATEGORIES.iter().map(|c| slot(*c)).collect(),
            other,
        }
    }
}
