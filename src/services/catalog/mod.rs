//! Catalog abstraction.
//!
//! The catalog persists items and categories. Two implementations share
//! the same contract:
//! - `SqliteCatalog` - rows in a SQLite database (default)
//! - `JsonFileCatalog` - a single JSON document rewritten on every change
//!
//! Handlers only see `Arc<dyn Catalog>`, so the backend is chosen once at
//! startup from configuration.

mod json_file;
mod sqlite;

pub use json_file::JsonFileCatalog;
pub use sqlite::SqliteCatalog;

use async_trait::async_trait;

use crate::config::StorageBackend;
use crate::models::{Category, Item, NewItem};
use crate::Result;

/// Persistence for items and categories.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Which backend this is, for health reporting.
    fn backend(&self) -> StorageBackend;

    /// Store an item and return it with its assigned id.
    async fn add_item(&self, item: NewItem) -> Result<Item>;

    /// All items in the backend's natural order.
    async fn list_items(&self) -> Result<Vec<Item>>;

    async fn get_item(&self, id: i64) -> Result<Option<Item>>;

    /// Store a category. Names are not required to be unique.
    async fn add_category(&self, name: &str) -> Result<Category>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn get_category(&self, id: i64) -> Result<Option<Category>>;

    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<()>;
}
