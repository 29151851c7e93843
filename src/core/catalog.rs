//! Catalog business logic - Categories and library items.
//!
//! Library items are the unpriced templates the admin wizard offers. Both upserts
//! are keyed on their unique columns and return the resolved row id, so repeating
//! them is harmless.

use crate::{
    entities::{Category, LibraryItem, category, library_item},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*, sea_query::OnConflict};
use tracing::info;

/// Inserts a category if its name is new and returns its id either way.
///
/// # Errors
/// Returns an error if the name is blank or the store rejects the statement.
pub async fn upsert_category(db: &DatabaseConnection, name: &str) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("category name", "cannot be empty"));
    }

    let row = category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    Category::insert(row)
        .on_conflict(
            OnConflict::column(category::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| Error::not_found("Category", name))
}

/// Inserts a library item or refreshes its blueprint path, returning its id.
///
/// # Errors
/// Returns an error if the name is blank or the store rejects the statement.
pub async fn upsert_library_item(
    db: &DatabaseConnection,
    category_id: i64,
    name: &str,
    blueprint_path: Option<String>,
) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("item name", "cannot be empty"));
    }

    let row = library_item::ActiveModel {
        category_id: Set(category_id),
        name: Set(name.to_string()),
        blueprint_path: Set(blueprint_path),
        ..Default::default()
    };
    LibraryItem::insert(row)
        .on_conflict(
            OnConflict::columns([library_item::Column::CategoryId, library_item::Column::Name])
                .update_column(library_item::Column::BlueprintPath)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    LibraryItem::find()
        .filter(library_item::Column::CategoryId.eq(category_id))
        .filter(library_item::Column::Name.eq(name))
        .one(db)
        .await?
        .map(|item| item.id)
        .ok_or_else(|| Error::not_found("Library item", name))
}

/// Files a library item under a category, creating the category if needed.
///
/// Both steps are upserts, so repeating the call only refreshes the blueprint path.
///
/// # Errors
/// Returns an error if either name is blank or the store rejects a statement.
pub async fn add_library_item(
    db: &DatabaseConnection,
    category_name: &str,
    item_name: &str,
    blueprint_path: Option<String>,
) -> Result<(category::Model, library_item::Model)> {
    let blueprint_path = blueprint_path
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty());
    let category_id = upsert_category(db, category_name).await?;
    let library_id = upsert_library_item(db, category_id, item_name, blueprint_path).await?;

    let category = get_category_by_id(db, category_id)
        .await?
        .ok_or_else(|| Error::not_found("Category", category_id))?;
    let item = get_library_item_by_id(db, library_id)
        .await?
        .ok_or_else(|| Error::not_found("Library item", library_id))?;
    info!(category = %category.name, item = %item.name, id = item.id, "Library item saved");
    Ok((category, item))
}

pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn get_library_item_by_id(
    db: &DatabaseConnection,
    library_id: i64,
) -> Result<Option<library_item::Model>> {
    LibraryItem::find_by_id(library_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists categories whose name contains `query`, alphabetically, at most `limit` rows.
pub async fn list_categories(
    db: &DatabaseConnection,
    query: &str,
    limit: u64,
) -> Result<Vec<category::Model>> {
    let mut select = Category::find();
    if !query.is_empty() {
        select = select.filter(category::Column::Name.contains(query));
    }
    select
        .order_by_asc(category::Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists one page of a category's library items in alphabetical order.
pub async fn list_items_by_category(
    db: &DatabaseConnection,
    category_id: i64,
    limit: u64,
    offset: u64,
) -> Result<Vec<library_item::Model>> {
    LibraryItem::find()
        .filter(library_item::Column::CategoryId.eq(category_id))
        .order_by_asc(library_item::Column::Name)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn count_items_in_category(db: &DatabaseConnection, category_id: i64) -> Result<u64> {
    LibraryItem::find()
        .filter(library_item::Column::CategoryId.eq(category_id))
        .count(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_upsert_category_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = upsert_category(&db, "Weapons").await?;
        let second = upsert_category(&db, "  Weapons ").await?;
        assert_eq!(first, second);

        let all = list_categories(&db, "", 25).await?;
        assert_eq!(all.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_category_rejects_blank() -> Result<()> {
        let db = setup_test_db().await?;
        let result = upsert_category(&db, "   ").await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_library_item_updates_blueprint() -> Result<()> {
        let db = setup_test_db().await?;
        let weapons = upsert_category(&db, "Weapons").await?;

        let id = upsert_library_item(&db, weapons, "Rifle", None).await?;
        let again =
            upsert_library_item(&db, weapons, "Rifle", Some("/bp/rifle".to_string())).await?;
        assert_eq!(id, again);

        let item = get_library_item_by_id(&db, id).await?.unwrap();
        assert_eq!(item.blueprint_path.as_deref(), Some("/bp/rifle"));
        assert_eq!(count_items_in_category(&db, weapons).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_item_name_in_two_categories() -> Result<()> {
        let db = setup_test_db().await?;
        let weapons = upsert_category(&db, "Weapons").await?;
        let tools = upsert_category(&db, "Tools").await?;

        let a = upsert_library_item(&db, weapons, "Pike", None).await?;
        let b = upsert_library_item(&db, tools, "Pike", None).await?;
        assert_ne!(a, b);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_categories_alphabetical_and_filtered() -> Result<()> {
        let db = setup_test_db().await?;
        for name in ["Weapons", "Armor", "Tools", "Ammo"] {
            upsert_category(&db, name).await?;
        }

        let names: Vec<String> = list_categories(&db, "", 25)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ammo", "Armor", "Tools", "Weapons"]);

        let limited = list_categories(&db, "", 2).await?;
        assert_eq!(limited.len(), 2);

        let filtered = list_categories(&db, "Ar", 25).await?;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Armor");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_items_by_category_paginates() -> Result<()> {
        let db = setup_test_db().await?;
        let weapons = upsert_category(&db, "Weapons").await?;
        for i in 0..30 {
            upsert_library_item(&db, weapons, &format!("Item {i:02}"), None).await?;
        }

        let page0 = list_items_by_category(&db, weapons, 25, 0).await?;
        let page1 = list_items_by_category(&db, weapons, 25, 25).await?;
        assert_eq!(page0.len(), 25);
        assert_eq!(page1.len(), 5);
        assert_eq!(page0[0].name, "Item 00");
        assert_eq!(page1[0].name, "Item 25");
        Ok(())
    }

    #[tokio::test]
    async fn test_add_library_item_creates_category_and_item() -> Result<()> {
        let db = setup_test_db().await?;

        let (weapons, rifle) = add_library_item(&db, "Weapons", "Rifle", None).await?;
        assert_eq!(weapons.name, "Weapons");
        assert_eq!(rifle.category_id, weapons.id);
        assert!(rifle.blueprint_path.is_none());

        let (again, refreshed) =
            add_library_item(&db, " Weapons ", "Rifle", Some(" /bp/rifle ".to_string())).await?;
        assert_eq!(again.id, weapons.id);
        assert_eq!(refreshed.id, rifle.id);
        assert_eq!(refreshed.blueprint_path.as_deref(), Some("/bp/rifle"));

        let (_, pike) = add_library_item(&db, "Weapons", "Pike", Some("  ".to_string())).await?;
        assert!(pike.blueprint_path.is_none());
        assert_eq!(count_items_in_category(&db, weapons.id).await?, 2);

        assert!(matches!(
            add_library_item(&db, "Weapons", " ", None).await,
            Err(Error::InvalidInput { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_category_cascades() -> Result<()> {
        let db = setup_test_db().await?;
        let weapons = upsert_category(&db, "Weapons").await?;
        let rifle = upsert_library_item(&db, weapons, "Rifle", None).await?;

        Category::delete_by_id(weapons).exec(&db).await?;

        assert!(get_library_item_by_id(&db, rifle).await?.is_none());
        assert!(get_category_by_id(&db, weapons).await?.is_none());
        Ok(())
    }
}
