//! Shared test utilities for `WrecksShop`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating catalog rows with sensible defaults.

use crate::{
    core::{
        catalog, kit,
        rcon::{KitComponent, KitDefaults},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an active kit holding one item and one dino, with no kit-level defaults.
pub async fn create_test_kit(db: &DatabaseConnection, name: &str) -> Result<entities::kit::Model> {
    kit::upsert_kit(
        db,
        name,
        &KitDefaults::default(),
        &[KitComponent::item("Pike"), KitComponent::dino("Raptor")],
    )
    .await
}

/// Sets up a database holding the "Weapons" category and its "Rifle" library item
/// (blueprint path `/bp/rifle`).
/// Returns (db, category, library item).
pub async fn setup_with_library_item() -> Result<(
    DatabaseConnection,
    entities::category::Model,
    entities::library_item::Model,
)> {
    let db = setup_test_db().await?;
    let (category, item) =
        catalog::add_library_item(&db, "Weapons", "Rifle", Some("/bp/rifle".to_string())).await?;
    Ok((db, category, item))
}
