//! Item database queries.

use crate::models::{Item, NewItem};
use crate::Result;

use super::DbPool;

/// Insert an item and return it with its assigned id.
pub async fn create_item(pool: &DbPool, input: &NewItem) -> Result<Item> {
    let item = sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (name, category, image_name)
        VALUES (?, ?, ?)
        RETURNING id, name, category, image_name
        "#,
    )
    .bind(&input.name)
    .bind(&input.category)
    .bind(&input.image_name)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

/// Get an item by id.
pub async fn get_item(pool: &DbPool, id: i64) -> Result<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(
        "SELECT id, name, category, image_name FROM items WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// List every item.
pub async fn list_items(pool: &DbPool) -> Result<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        "SELECT id, name, category, image_name FROM items ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_pool, initialize_schema};

    async fn setup() -> DbPool {
        let pool = init_pool(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();
        pool
    }

    fn jacket() -> NewItem {
        NewItem {
            name: "jacket".into(),
            category: "outerwear".into(),
            image_name: "abc.jpg".into(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let pool = setup().await;

        let first = create_item(&pool, &jacket()).await.unwrap();
        let second = create_item(&pool, &jacket()).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.name, "jacket");
        assert_eq!(first.category, "outerwear");
        assert_eq!(first.image_name, "abc.jpg");
    }

    #[tokio::test]
    async fn test_get_item_round_trips_fields() {
        let pool = setup().await;
        let created = create_item(&pool, &jacket()).await.unwrap();

        let fetched = get_item(&pool, created.id).await.unwrap();
        assert_eq!(fetched, Some(created));

        assert_eq!(get_item(&pool, 99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_items() {
        let pool = setup().await;
        assert!(list_items(&pool).await.unwrap().is_empty());

        for _ in 0..3 {
            create_item(&pool, &jacket()).await.unwrap();
        }

        assert_eq!(list_items(&pool).await.unwrap().len(), 3);
    }
}
