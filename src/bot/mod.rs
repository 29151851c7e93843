//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `WrecksShop` application,
//! including all slash commands, the interactive add-item wizard, autocomplete
//! handlers, and bot context management.

/// Discord command implementations (shop, management, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, wizard components)
pub mod handlers;

use crate::{
    config::{self, shop::ShopConfig},
    core::auth::Operator,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection pool, the read-only shop
/// configuration, and the wizard idle timeout.
pub struct BotData {
    /// Database connection pool for all catalog operations
    pub database: DatabaseConnection,
    /// Admin roles, discount rules and active event, loaded once at startup
    pub shop: Arc<ShopConfig>,
    /// How long an add-item wizard may sit idle before it is discarded
    pub wizard_timeout: Duration,
}

impl BotData {
    /// Creates a new `BotData` instance.
    /// This is typically called during bot initialization to set up the
    /// shared context for all commands.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        shop: Arc<ShopConfig>,
        wizard_timeout: Duration,
    ) -> Self {
        Self {
            database,
            shop,
            wizard_timeout,
        }
    }
}

/// Poise context carrying [`BotData`].
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Describes the invoking member for authorization and pricing.
///
/// Outside a guild there is no member, so the operator has no roles and no
/// administrator capability.
pub async fn operator_for(ctx: Context<'_>) -> Operator {
    match ctx.author_member().await {
        Some(member) => Operator {
            has_admin_capability: member
                .permissions
                .is_some_and(|permissions| permissions.administrator()),
            role_ids: member.roles.iter().map(ToString::to_string).collect(),
        },
        None => Operator::default(),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
///
/// # Errors
/// Returns an error if the client cannot be created or the gateway connection fails.
#[instrument(skip(token, shop, database))]
pub async fn run_bot(
    token: String,
    shop: Arc<ShopConfig>,
    database: DatabaseConnection,
    wizard_timeout: Duration,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::shop(),
                commands::shop_manage(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                if let Some(guild_id) = config::get_dev_guild_id() {
                    let guild_id = serenity::GuildId::new(guild_id);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        guild_id,
                    )
                    .await?;
                    info!("Registered commands in guild {}", guild_id);
                } else {
                    info!("Registering commands globally...");
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                }
                Ok(BotData::new(database, shop, wizard_timeout))
            })
        })
        .build();

    // Slash commands and component interactions need no privileged intents
    let intents = serenity::GatewayIntents::GUILDS;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
