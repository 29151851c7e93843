//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**WrecksShop Help**\n\
        Here is a summary of all available commands.\n\n\
        **Shop Commands**\n\
        • `/shop` - Lists everything for sale, priced with your discounts.\n\n\
        **Management Commands** (admins only)\n\
        • `/shop_manage library <category> <name> [blueprint_path]` - Files a library item the wizard can offer.\n\
        • `/shop_manage add` - Walks you through adding a library item or kit to the shop.\n\
        • `/shop_manage disable_kit <name>` - Stops offering a kit in the wizard.\n\
        • `/shop_manage disable <name>` - Hides an item from the shop but keeps its record.\n\
        • `/shop_manage remove <name>` - Permanently deletes an item from the shop.\n\
        • `/shop_manage preview <name> [player_id] [eos_id]` - Shows the RCON commands a purchase would run.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
