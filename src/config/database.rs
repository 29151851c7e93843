//! Database configuration module for `WrecksShop`.
//!
//! This module handles the pooled database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation uses `IF NOT EXISTS` and is
//! safe to run on every start.

use crate::entities::{Category, Kit, KitComponent, LibraryItem, ShopItem, library_item};
use crate::errors::Result;
use sea_orm::sea_query::{Index, TableCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/wrecks_shop.sqlite?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Reads the pool size from `DB_MAX_CONNECTIONS`, falling back to a small fixed pool.
#[must_use]
pub fn get_max_connections() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_CONNECTIONS)
}

/// Establishes a bounded connection pool to the database named by `DATABASE_URL`.
///
/// Each store call checks a connection out of this pool and returns it when the
/// statement finishes, so nothing is held while the bot waits on a user.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let url = get_database_url();
    let max_connections = get_max_connections();

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    info!(max_connections, "Connecting to catalog store");
    Database::connect(options).await.map_err(Into::into)
}

fn create_table_stmt<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    stmt
}

/// Creates all catalog tables plus the `(category_id, name)` unique index on library items.
///
/// Tables are created parents first so the foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        create_table_stmt(&schema, Category),
        create_table_stmt(&schema, LibraryItem),
        create_table_stmt(&schema, Kit),
        create_table_stmt(&schema, KitComponent),
        create_table_stmt(&schema, ShopItem),
    ];
    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    let library_unique = Index::create()
        .name("uq_shop_item_library_category_name")
        .table(LibraryItem)
        .col(library_item::Column::CategoryId)
        .col(library_item::Column::Name)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&library_unique)).await?;

    debug!("Catalog tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CategoryModel, KitModel, LibraryItemModel, ShopItemModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<LibraryItemModel> = LibraryItem::find().limit(1).all(&db).await?;
        let _: Vec<KitModel> = Kit::find().limit(1).all(&db).await?;
        let _: Vec<ShopItemModel> = ShopItem::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_twice() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
