//! Database layer for the marketplace.
//!
//! Provides SQLite connection pooling and query modules
//! for items and categories.

mod categories;
mod items;
mod pool;

pub use categories::*;
pub use items::*;
pub use pool::{health_check, PoolConfig};

use crate::Result;
use std::path::Path;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool.
///
/// Creates parent directories if needed. `:memory:` databases get a
/// single long-lived connection so the data outlives each query.
pub async fn init_pool(path: &str) -> Result<DbPool> {
    let config = if path == ":memory:" {
        PoolConfig::in_memory()
    } else {
        PoolConfig::default()
    };
    init_pool_with_config(path, config).await
}

/// Initialize a pool with explicit settings.
pub async fn init_pool_with_config(path: &str, config: PoolConfig) -> Result<DbPool> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let options = config.build_connect_options(path)?;
    let pool = config.build_pool_options().connect_with(options).await?;

    info!("Database pool initialized: {}", path);

    Ok(pool)
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    for statement in schema.split(';') {
        // Strip comment lines, keeping only actual SQL
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt).execute(pool).await?;
    }

    info!("Database schema initialized successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_pool_in_memory() {
        let pool = init_pool(":memory:").await.unwrap();
        assert!(pool.size() > 0);
    }

    #[tokio::test]
    async fn test_schema_initialization_is_idempotent() {
        let pool = init_pool(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();
        initialize_schema(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(table_names, vec!["categories", "items"]);
    }

    #[tokio::test]
    async fn test_init_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/db/mercari.sqlite3");

        let pool = init_pool(path.to_str().unwrap()).await.unwrap();
        initialize_schema(&pool).await.unwrap();

        assert!(path.exists());
    }
}
