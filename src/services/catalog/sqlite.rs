//! SQLite-backed catalog.

use async_trait::async_trait;

use super::Catalog;
use crate::config::StorageBackend;
use crate::db::{self, DbPool};
use crate::models::{Category, Item, NewItem};
use crate::Result;

/// Catalog stored in SQLite through a shared connection pool.
///
/// Write serialization is left to SQLite's own locking.
#[derive(Clone)]
pub struct SqliteCatalog {
    db: DbPool,
}

impl SqliteCatalog {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Open the database at `path` and apply the schema.
    pub async fn open(path: &str) -> Result<Self> {
        let db = db::init_pool(path).await?;
        db::initialize_schema(&db).await?;
        Ok(Self::new(db))
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Sqlite
    }

    async fn add_item(&self, item: NewItem) -> Result<Item> {
        db::create_item(&self.db, &item).await
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        db::list_items(&self.db).await
    }

    async fn get_item(&self, id: i64) -> Result<Option<Item>> {
        db::get_item(&self.db, id).await
    }

    async fn add_category(&self, name: &str) -> Result<Category> {
        db::create_category(&self.db, name).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        db::list_categories(&self.db).await
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        db::get_category(&self.db, id).await
    }

    async fn health_check(&self) -> Result<()> {
        db::health_check(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_catalog_items_and_categories() {
        let catalog = SqliteCatalog::open(":memory:").await.unwrap();

        let category = catalog.add_category("outerwear").await.unwrap();
        assert_eq!(catalog.get_category(category.id).await.unwrap(), Some(category));

        let item = catalog
            .add_item(NewItem {
                name: "jacket".into(),
                category: "outerwear".into(),
                image_name: "abc.jpg".into(),
            })
            .await
            .unwrap();

        assert_eq!(catalog.list_items().await.unwrap(), vec![item.clone()]);
        assert_eq!(catalog.get_item(item.id).await.unwrap(), Some(item));
        catalog.health_check().await.unwrap();
    }
}
