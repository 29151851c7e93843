//! Shop item entity - A live, priced entry members can buy.
//!
//! A shop item references either a library item (`kind = single`) or a kit
//! (`kind = kit`), never both. Name, blueprint path and category are copied from the
//! library item when the entry is created. A library item or kit that a shop item
//! still references cannot be deleted, so every shop item stays deliverable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a shop item sells one library item or a whole kit
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ShopItemKind {
    /// Backed by a library item
    #[sea_orm(string_value = "single")]
    Single,
    /// Backed by a kit
    #[sea_orm(string_value = "kit")]
    Kit,
}

impl std::fmt::Display for ShopItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Kit => f.write_str("kit"),
        }
    }
}

/// Shop item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_item")]
pub struct Model {
    /// Unique identifier for the shop item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Single item or kit
    pub kind: ShopItemKind,
    /// Source library item, set only for `single`
    pub library_id: Option<i64>,
    /// Source kit, set only for `kit`
    pub kit_id: Option<i64>,
    /// Category of the source library item, set only for `single`
    pub category_id: Option<i64>,
    /// Display name
    pub name: String,
    /// Item identifier used in RCON commands for `single`
    pub blueprint_path: Option<String>,
    /// Base price in points
    pub price: i64,
    /// Units (or kit copies) delivered per purchase
    pub quantity: i32,
    /// Item quality for `single`
    pub quality: Option<i32>,
    /// Whether a `single` item is delivered as a blueprint
    pub is_blueprint: bool,
    /// Cap on one buyer's cumulative purchases
    pub buy_limit: Option<i32>,
    /// Soft delete flag - inactive items are hidden from the shop
    pub active: bool,
    /// When the shop item was created
    pub created_at: DateTime,
    /// When the shop item was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between `ShopItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Source library item; it cannot be deleted while shop items reference it
    #[sea_orm(
        belongs_to = "super::library_item::Entity",
        from = "Column::LibraryId",
        to = "super::library_item::Column::Id",
        on_delete = "Restrict"
    )]
    LibraryItem,
    /// Source kit; it cannot be deleted while shop items reference it
    #[sea_orm(
        belongs_to = "super::kit::Entity",
        from = "Column::KitId",
        to = "super::kit::Column::Id",
        on_delete = "Restrict"
    )]
    Kit,
    /// Optional category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::library_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryItem.def()
    }
}

impl Related<super::kit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
