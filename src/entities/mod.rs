//! Entity module - Contains all SeaORM entity definitions for the shop catalog.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod kit;
pub mod kit_component;
pub mod library_item;
pub mod shop_item;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use kit::{Column as KitColumn, Entity as Kit, Model as KitModel};
pub use kit_component::{
    Column as KitComponentColumn, Entity as KitComponent, Model as KitComponentModel,
};
pub use library_item::{
    Column as LibraryItemColumn, Entity as LibraryItem, Model as LibraryItemModel,
};
pub use shop_item::{
    Column as ShopItemColumn, Entity as ShopItem, Model as ShopItemModel, ShopItemKind,
};
