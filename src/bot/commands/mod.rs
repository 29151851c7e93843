//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Storefront browsing and catalog management commands
pub mod shop;

// Export commands
pub use general::*;
pub use shop::*;
