//! Listing service.
//!
//! Ingests new listings: resolves the category, stores the image by
//! content hash and records the item. The image write and the item insert
//! are not transactional; an insert failure leaves an orphaned image file,
//! which is harmless because a re-upload rewrites the same file.

use std::sync::Arc;

use crate::models::{Item, NewItem};
use crate::services::{Catalog, ImageStorageService};
use crate::{Error, Result};

/// How an upload names its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRef {
    /// Free-text category stored as given.
    Name(String),
    /// Reference to an existing category row, stored by its name.
    Id(i64),
}

impl Default for CategoryRef {
    fn default() -> Self {
        Self::Name(String::new())
    }
}

/// A listing submitted by a client.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub name: String,
    pub category: CategoryRef,
    pub image: Vec<u8>,
}

/// Service that creates listings.
#[derive(Clone)]
pub struct ListingService {
    catalog: Arc<dyn Catalog>,
    images: Arc<ImageStorageService>,
}

impl ListingService {
    pub fn new(catalog: Arc<dyn Catalog>, images: Arc<ImageStorageService>) -> Self {
        Self { catalog, images }
    }

    /// Create a listing.
    ///
    /// The category is resolved before anything is written, so an unknown
    /// `CategoryRef::Id` leaves both the catalog and the image directory
    /// untouched.
    pub async fn create(&self, listing: NewListing) -> Result<Item> {
        let category = self.resolve_category(listing.category).await?;
        let image_name = self.images.store(&listing.image).await?;

        let item = self
            .catalog
            .add_item(NewItem {
                name: listing.name,
                category,
                image_name,
            })
            .await?;

        tracing::info!(
            id = item.id,
            name = %item.name,
            category = %item.category,
            image = %item.image_name,
            "Item created"
        );

        Ok(item)
    }

    async fn resolve_category(&self, category: CategoryRef) -> Result<String> {
        match category {
            CategoryRef::Name(name) => Ok(name),
            CategoryRef::Id(id) => self
                .catalog
                .get_category(id)
                .await?
                .map(|c| c.name)
                .ok_or(Error::CategoryNotFound(id)),
        }
    }
}
