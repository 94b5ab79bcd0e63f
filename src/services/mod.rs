//! Service layer for the marketplace.
//!
//! Contains the business logic behind the HTTP handlers:
//! - Catalog (item and category persistence, SQLite or JSON file)
//! - ImageStorage (content-addressed image files)
//! - Listing (item ingestion across catalog and image storage)

pub mod catalog;
mod image_storage;
mod listing;

pub use catalog::{Catalog, JsonFileCatalog, SqliteCatalog};
pub use image_storage::{validate_image_name, ImageStorageService, LoadedImage, IMAGE_EXTENSION};
pub use listing::{CategoryRef, ListingService, NewListing};
