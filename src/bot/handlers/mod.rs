//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete,
//! select menus, buttons and modals.

/// Autocomplete handlers for shop item names
pub mod autocomplete;
/// Component-driven add-item wizard
pub mod wizard;
