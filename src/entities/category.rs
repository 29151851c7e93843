//! Category entity - Groups library items for the admin wizard.
//!
//! Categories are created by admins or by the seed tooling and are never renamed.
//! Deleting a category cascades to its library items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_category")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Weapons"), unique across categories
    #[sea_orm(unique)]
    pub name: String,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many library items
    #[sea_orm(has_many = "super::library_item::Entity")]
    LibraryItems,
}

impl Related<super::library_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
