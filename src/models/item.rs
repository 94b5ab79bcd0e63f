//! Item listing models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A listed item.
///
/// `image_name` is the content-addressed file name of the item's image
/// (`<sha256 hex>.jpg`); the file itself may be missing on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_name: String,
}

/// Input for creating an item. The id is assigned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub image_name: String,
}

impl NewItem {
    pub fn with_id(self, id: i64) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            image_name: self.image_name,
        }
    }
}
