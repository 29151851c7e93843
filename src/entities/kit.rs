//! Kit entity - A named bundle of item and dino components.
//!
//! The `default_*` columns are kit-level fallbacks applied to any component that
//! leaves the corresponding field unset.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_kit")]
pub struct Model {
    /// Unique identifier for the kit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Kit name (e.g., "Starter Kit"), unique across kits
    #[sea_orm(unique)]
    pub name: String,
    /// Inactive kits are hidden from the admin wizard
    pub active: bool,
    /// Default item quantity
    pub default_qty: Option<i32>,
    /// Default item quality
    pub default_quality: Option<i32>,
    /// Default blueprint flag for items
    pub default_is_bp: Option<bool>,
    /// Default dino level
    pub default_lvl: Option<i32>,
    /// Default breedable flag for dinos
    pub default_breedable: Option<bool>,
}

/// Defines relationships between Kit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One kit has many components
    #[sea_orm(has_many = "super::kit_component::Entity")]
    Components,
}

impl Related<super::kit_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
