//! Category database queries.

use crate::models::Category;
use crate::Result;

use super::DbPool;

/// Insert a category. Duplicate names create distinct rows.
pub async fn create_category(pool: &DbPool, name: &str) -> Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Get a category by id.
pub async fn get_category(pool: &DbPool, id: i64) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// List every category.
pub async fn list_categories(pool: &DbPool) -> Result<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(pool)
            .await?;

    Ok(categories)
}
