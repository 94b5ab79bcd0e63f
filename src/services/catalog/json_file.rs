//! Flat-file catalog.
//!
//! The whole catalog is one JSON document:
//!
//! ```json
//! {
//!   "items": [{"id": 1, "name": "jacket", "category": "outerwear", "image_name": "..."}],
//!   "categories": [{"id": 1, "name": "outerwear"}]
//! }
//! ```
//!
//! Every mutation reads the document, changes it and writes it back. All
//! access goes through one mutex so concurrent requests in this process
//! cannot interleave a read-modify-write cycle. The document is replaced
//! via a temporary file and rename, so readers never see a partial write.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use super::Catalog;
use crate::config::StorageBackend;
use crate::models::{Category, Item, NewItem};
use crate::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    categories: Vec<Category>,
}

/// Catalog persisted as a single JSON file.
pub struct JsonFileCatalog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Read the document. A missing file is an empty catalog.
    async fn read(&self) -> Result<CatalogDocument> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CatalogDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, document: &CatalogDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}

fn next_id<I: Iterator<Item = i64>>(ids: I) -> i64 {
    ids.max().unwrap_or(0) + 1
}

#[async_trait]
impl Catalog for JsonFileCatalog {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Json
    }

    async fn add_item(&self, item: NewItem) -> Result<Item> {
        let _guard = self.lock.lock().await;

        let mut document = self.read().await?;
        let item = item.with_id(next_id(document.items.iter().map(|i| i.id)));
        document.items.push(item.clone());
        self.write(&document).await?;

        Ok(item)
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.items)
    }

    async fn get_item(&self, id: i64) -> Result<Option<Item>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.items.into_iter().find(|i| i.id == id))
    }

    async fn add_category(&self, name: &str) -> Result<Category> {
        let _guard = self.lock.lock().await;

        let mut document = self.read().await?;
        let category = Category {
            id: next_id(document.categories.iter().map(|c| c.id)),
            name: name.to_string(),
        };
        document.categories.push(category.clone());
        self.write(&document).await?;

        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.categories)
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read()
            .await?
            .categories
            .into_iter()
            .find(|c| c.id == id))
    }

    async fn health_check(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.read().await.map(|_| ())
    }
}
