//! Kit component entity - One item or dino inside a kit.
//!
//! `kind` is stored as written so that an unrecognized kind is reported when the
//! kit is turned into commands instead of being dropped on the way in.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kit component database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_kit_component")]
pub struct Model {
    /// Unique identifier for the component
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning kit
    pub kit_id: i64,
    /// Zero-based position inside the kit; commands are emitted in this order
    pub position: i32,
    /// `"item"` or `"dino"`
    pub kind: String,
    /// Item blueprint or dino class to hand out
    pub reference: String,
    /// Per-component player id override (items)
    pub player_id: Option<i64>,
    /// Per-component EOS id override (dinos)
    pub eos_id: Option<String>,
    /// Item quantity
    pub qty: Option<i32>,
    /// Item quality
    pub quality: Option<i32>,
    /// Dino level
    pub lvl: Option<i32>,
    /// Whether a dino may breed
    pub breedable: Option<bool>,
    /// Whether an item is handed out as a blueprint
    pub is_bp: Option<bool>,
}

/// Defines relationships between `KitComponent` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each component belongs to one kit
    #[sea_orm(
        belongs_to = "super::kit::Entity",
        from = "Column::KitId",
        to = "super::kit::Column::Id",
        on_delete = "Cascade"
    )]
    Kit,
}

impl Related<super::kit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
