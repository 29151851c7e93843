//! Core business logic - framework-agnostic catalog, pricing, command synthesis,
//! and the admin configuration wizard.
//!
//! Nothing in here knows about Discord. The bot layer calls these functions and
//! renders their results.

/// Admin role set and the shop administration check
pub mod auth;
/// Categories and library items
pub mod catalog;
/// Kits and their components
pub mod kit;
/// Discount rules and effective price calculation
pub mod pricing;
/// RCON command builders for items, dinos, and kits
pub mod rcon;
/// Live shop items and delivery command resolution
pub mod shop_item;
/// The category → item → pricing state machine
pub mod wizard;
