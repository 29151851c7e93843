//! Unified error type for `WrecksShop`.
//!
//! Every fallible operation in the crate returns [`Result`]. Each variant maps to
//! one short, human-readable message that the Discord layer shows to the operator.

use thiserror::Error;

/// Errors produced by the catalog, pricing, command synthesis, and bot layers.
#[derive(Debug, Error)]
pub enum Error {
    /// The operator holds neither the administrator capability nor a configured admin role
    #[error("You are not allowed to manage the shop.")]
    Unauthorized,

    /// A previously listed row vanished, or a lookup by name/id found nothing
    #[error("{entity} '{id}' was not found.")]
    NotFound {
        /// Kind of row that was looked up (e.g. "Kit")
        entity: &'static str,
        /// Identifier used for the lookup
        id: String,
    },

    /// A form field or a shop item draft failed validation
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// A kit component carries a kind other than `item` or `dino`
    #[error("Unknown kit component kind '{kind}'")]
    UnknownComponentKind {
        /// The unrecognized kind as stored
        kind: String,
    },

    /// The catalog store could not be reached or rejected a statement
    #[error("Catalog store unavailable: {0}")]
    StoreUnavailable(#[from] sea_orm::DbErr),

    /// The wizard sat idle past its timeout and its selections were discarded
    #[error("This shop wizard expired. Run the command again to start over.")]
    SessionExpired,

    /// Static configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Details about the failure
        message: String,
    },

    /// A required environment variable is missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing a formatted message failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise returned an error while talking to Discord
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for building an [`Error::InvalidInput`].
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for building an [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
