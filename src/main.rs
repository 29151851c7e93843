use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wrecks_shop::{
    bot,
    config::{self, database},
    core::kit,
    errors::{Error, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load admin roles, discounts and kits
    let shop_config = config::shop::load_default_config()
        .inspect_err(|e| error!("Failed to load shop configuration: {}", e))?;
    info!(
        admin_roles = shop_config.admin_roles.len(),
        discounts = shop_config.pricing.rules().len(),
        "Shop configuration loaded"
    );

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Upsert configured kits
    kit::seed_kits(&db, &shop_config.kits)
        .await
        .inspect_err(|e| error!("Failed to seed kits: {}", e))?;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(
        token,
        Arc::new(shop_config),
        db,
        config::get_wizard_timeout(),
    )
    .await
}
