//! Library item entity - An unpriced catalog template.
//!
//! A library item names something the game can hand out (category + name + optional
//! blueprint path). It only becomes sellable once the wizard prices it into a shop item.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Library item database model, unique per `(category_id, name)`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_item_library")]
pub struct Model {
    /// Unique identifier for the library item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning category
    pub category_id: i64,
    /// Item name as shown to admins (e.g., "Rifle")
    pub name: String,
    /// In-game blueprint path used as the item identifier in RCON commands
    pub blueprint_path: Option<String>,
}

/// Defines relationships between `LibraryItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each library item belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
