//! Shop Discord commands - `shop` and `shop_manage`.
//!
//! `/shop` is open to everyone and shows each member their own discounted price.
//! `/shop_manage` is gated on the admin check and groups catalog upkeep (library
//! items, kit disabling), the add wizard, removal, and a dry-run delivery preview.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            handlers::{autocomplete, wizard},
            operator_for,
        },
        core::{
            auth, catalog, kit,
            rcon::{self, DeliveryTarget},
            shop_item,
        },
        entities::ShopItemKind,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    /// Discord's cap on embed fields
    const MAX_EMBED_FIELDS: usize = 25;

    /// Replies with a refusal and returns `false` unless the caller may manage the shop.
    async fn ensure_admin(ctx: Context<'_>) -> Result<bool> {
        let operator = operator_for(ctx).await;
        match auth::authorize(&operator, &ctx.data().shop.admin_roles) {
            Ok(()) => Ok(true),
            Err(e @ Error::Unauthorized) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ {e}"))
                        .ephemeral(true),
                )
                .await?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Lists every item for sale with the price you would pay.
    #[poise::command(slash_command)]
    pub async fn shop(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let items = shop_item::get_active_shop_items(&data.database).await?;

        if items.is_empty() {
            ctx.say("The shop is empty right now. Check back later!")
                .await?;
            return Ok(());
        }

        let operator = operator_for(ctx).await;
        let event = data.shop.active_event.as_deref();
        let total = items.len();

        let mut embed_fields = Vec::with_capacity(total.min(MAX_EMBED_FIELDS));
        for item in items.into_iter().take(MAX_EMBED_FIELDS) {
            let price = data
                .shop
                .pricing
                .effective_price(item.price, &operator.role_ids, event);

            let mut value = if price == item.price {
                format!("**{price}** points")
            } else {
                format!("~~{}~~ **{price}** points", item.price)
            };
            write!(value, " · qty {}", item.quantity)?;
            if item.kind == ShopItemKind::Kit {
                value.push_str(" · kit");
            } else if item.is_blueprint {
                value.push_str(" · blueprint");
            }
            if let Some(limit) = item.buy_limit {
                write!(value, " · limit {limit}")?;
            }
            embed_fields.push((item.name, value, false));
        }

        let mut embed = serenity::CreateEmbed::default()
            .title("**Wrecks Shop**")
            .color(0x0058_65F2) // Discord purple
            .fields(embed_fields);
        if total > MAX_EMBED_FIELDS {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {MAX_EMBED_FIELDS} of {total} items"
            )));
        }
        if let Some(event) = event {
            embed = embed.description(format!("🎉 Event running: **{event}**"));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Parent command for managing the shop catalog.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands(
            "shop_manage_add",
            "shop_manage_library",
            "shop_manage_disable_kit",
            "shop_manage_remove",
            "shop_manage_disable",
            "shop_manage_preview"
        )
    )]
    pub async fn shop_manage(ctx: Context<'_>) -> Result<()> {
        let help_text = "Shop management command. Available subcommands:\n\
            `/shop_manage add` - Add a library item or kit to the shop\n\
            `/shop_manage library` - File a library item under a category\n\
            `/shop_manage disable_kit` - Stop offering a kit in the wizard\n\
            `/shop_manage disable` - Hide an item from the shop\n\
            `/shop_manage remove` - Delete an item from the shop\n\
            `/shop_manage preview` - Show the RCON commands for an item";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a library item or kit to the shop through an interactive wizard.
    #[poise::command(slash_command, rename = "add")]
    pub async fn shop_manage_add(ctx: Context<'_>) -> Result<()> {
        wizard::run_add_wizard(ctx).await
    }

    /// Files a library item under a category so the add wizard can offer it.
    #[poise::command(slash_command, rename = "library")]
    pub async fn shop_manage_library(
        ctx: Context<'_>,
        #[description = "Category to file the item under (created if new)"] category: String,
        #[description = "Display name of the item"] name: String,
        #[description = "Blueprint path sent in RCON commands (defaults to the name)"]
        blueprint_path: Option<String>,
    ) -> Result<()> {
        if !ensure_admin(ctx).await? {
            return Ok(());
        }

        match catalog::add_library_item(&ctx.data().database, &category, &name, blueprint_path)
            .await
        {
            Ok((category, item)) => {
                info!(category = %category.name, item = %item.name, user = %ctx.author().id, "Library item filed");
                let blueprint = item.blueprint_path.as_deref().unwrap_or("none");
                ctx.say(format!(
                    "✅ **{}** is in the **{}** library (blueprint: `{blueprint}`).",
                    item.name, category.name
                ))
                .await?;
            }
            Err(e @ Error::InvalidInput { .. }) => {
                ctx.say(format!("❌ {e}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Stops offering a kit in the add wizard. Existing shop items keep working.
    #[poise::command(slash_command, rename = "disable_kit")]
    pub async fn shop_manage_disable_kit(
        ctx: Context<'_>,
        #[description = "Name of the kit to disable"]
        #[autocomplete = "autocomplete::autocomplete_kit_name"]
        name: String,
    ) -> Result<()> {
        if !ensure_admin(ctx).await? {
            return Ok(());
        }

        match kit::deactivate_kit_by_name(&ctx.data().database, &name).await {
            Ok(kit) => {
                info!(kit = %kit.name, user = %ctx.author().id, "Kit disabled");
                ctx.say(format!(
                    "✅ Kit **{}** is no longer offered. It comes back on restart if it is still in config.toml.",
                    kit.name
                ))
                .await?;
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("⚠️ No kit named '{name}' exists.")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Permanently deletes every shop item with the given name.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn shop_manage_remove(
        ctx: Context<'_>,
        #[description = "Name of the shop item to delete"]
        #[autocomplete = "autocomplete::autocomplete_shop_item_name"]
        name: String,
    ) -> Result<()> {
        if !ensure_admin(ctx).await? {
            return Ok(());
        }

        match shop_item::delete_shop_items_by_name(&ctx.data().database, &name).await {
            Ok(removed) => {
                info!(name = %name, removed, user = %ctx.author().id, "Shop item removed");
                ctx.say(format!("✅ Removed **{name}** from the shop."))
                    .await?;
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("⚠️ No shop item named '{name}' exists."))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Hides a shop item without deleting its record.
    #[poise::command(slash_command, rename = "disable")]
    pub async fn shop_manage_disable(
        ctx: Context<'_>,
        #[description = "Name of the shop item to disable"]
        #[autocomplete = "autocomplete::autocomplete_shop_item_name"]
        name: String,
    ) -> Result<()> {
        if !ensure_admin(ctx).await? {
            return Ok(());
        }

        match shop_item::deactivate_shop_item(&ctx.data().database, &name).await {
            Ok(_) => {
                info!(name = %name, user = %ctx.author().id, "Shop item disabled");
                ctx.say(format!("✅ **{name}** is no longer for sale."))
                    .await?;
            }
            Err(Error::NotFound { .. }) => {
                ctx.say(format!("⚠️ No shop item named '{name}' exists."))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Shows the RCON commands a purchase of the item would run, without running them.
    #[poise::command(slash_command, rename = "preview")]
    pub async fn shop_manage_preview(
        ctx: Context<'_>,
        #[description = "Name of the shop item"]
        #[autocomplete = "autocomplete::autocomplete_shop_item_name"]
        name: String,
        #[description = "In-game player id (defaults to 1)"] player_id: Option<i64>,
        #[description = "EOS id used as the dino spawn target"] eos_id: Option<String>,
    ) -> Result<()> {
        if !ensure_admin(ctx).await? {
            return Ok(());
        }

        let db = &ctx.data().database;
        let Some(item) = shop_item::get_shop_item_by_name(db, &name).await? else {
            ctx.say(format!("⚠️ No active shop item named '{name}' exists."))
                .await?;
            return Ok(());
        };

        let target = DeliveryTarget { player_id, eos_id };
        let commands = match shop_item::delivery_commands(db, &item, &target).await {
            Ok(commands) => commands,
            Err(e @ (Error::UnknownComponentKind { .. } | Error::NotFound { .. })) => {
                ctx.say(format!("❌ Cannot build commands for '{name}': {e}"))
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let mut message = format!("**{}** ({})\n```\n", item.name, item.kind);
        for command in &commands {
            writeln!(message, "{command}")?;
        }
        message.push_str("```\nJoined:\n```\n");
        message.push_str(&commands.join(rcon::DEFAULT_DELIMITER));
        message.push_str("\n```");

        ctx.send(
            poise::CreateReply::default()
                .content(message)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
