//! Application state for the marketplace.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::services::{Catalog, ImageStorageService, JsonFileCatalog, ListingService, SqliteCatalog};
use crate::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Item and category persistence.
    pub catalog: Arc<dyn Catalog>,
    /// Content-addressed image files.
    pub images: Arc<ImageStorageService>,
    /// Item ingestion.
    pub listings: ListingService,
    /// Largest accepted request body, in bytes.
    pub upload_limit: usize,
}

impl AppState {
    /// Create the application state from configuration, opening the
    /// configured catalog backend.
    pub async fn new(config: &Config) -> Result<Self> {
        let storage = &config.storage;

        let catalog: Arc<dyn Catalog> = match storage.backend {
            StorageBackend::Sqlite => Arc::new(SqliteCatalog::open(&storage.database_path).await?),
            StorageBackend::Json => Arc::new(JsonFileCatalog::new(&storage.items_json_path)),
        };
        tracing::info!(backend = storage.backend.as_str(), "Catalog opened");

        let images = Arc::new(ImageStorageService::new(
            &storage.image_dir,
            &storage.default_image,
        ));

        Ok(Self::from_parts(catalog, images, storage.max_upload_size))
    }

    /// Assemble state from already-built services.
    pub fn from_parts(
        catalog: Arc<dyn Catalog>,
        images: Arc<ImageStorageService>,
        upload_limit: usize,
    ) -> Self {
        let listings = ListingService::new(catalog.clone(), images.clone());
        Self {
            catalog,
            images,
            listings,
            upload_limit,
        }
    }
}
