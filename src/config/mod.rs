/// Database configuration and connection management
pub mod database;

/// Admin roles, discounts, and kits loaded from config.toml
pub mod shop;

use std::time::Duration;

/// Reads the wizard idle timeout from `WIZARD_TIMEOUT_SECS`, defaulting to five minutes.
#[must_use]
pub fn get_wizard_timeout() -> Duration {
    std::env::var("WIZARD_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map_or(crate::core::wizard::DEFAULT_IDLE_TIMEOUT, Duration::from_secs)
}

/// Reads `DEV_GUILD_ID`; when set, commands are registered in that guild only.
#[must_use]
pub fn get_dev_guild_id() -> Option<u64> {
    std::env::var("DEV_GUILD_ID")
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}
