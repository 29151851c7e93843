//! Shop configuration loading from config.toml
//!
//! The file carries the admin role list, the discount rules, the optional active
//! event tag, and kit definitions. Admin roles and discounts are read as loose TOML
//! values and validated here; malformed entries are logged and skipped so one bad
//! line never blocks a purchase or locks admins out.

use crate::{
    core::{
        auth::AdminRoles,
        pricing::{DiscountKind, DiscountRule, PricingEngine},
        rcon::{ComponentKind, KitComponent, KitDefaults},
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure mirroring config.toml before validation
#[derive(Debug, Default, Deserialize)]
struct RawShopConfig {
    #[serde(default)]
    active_event: Option<String>,
    #[serde(default)]
    admin_roles: Vec<toml::Value>,
    #[serde(default)]
    discounts: Vec<toml::Value>,
    #[serde(default)]
    kits: Vec<KitConfig>,
}

#[derive(Debug, Deserialize)]
struct RawDiscount {
    #[serde(rename = "type")]
    kind: String,
    target: toml::Value,
    amount: f64,
}

/// A kit as written in config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct KitConfig {
    /// Kit name, used as its unique key
    pub name: String,
    /// Kit-level fallbacks for component fields
    #[serde(default)]
    pub defaults: KitDefaults,
    /// Components in delivery order
    #[serde(default)]
    pub components: Vec<KitComponent>,
}

/// Validated, read-only shop configuration
#[derive(Debug, Default)]
pub struct ShopConfig {
    /// Event tag matched by `event` discounts, if an event is running
    pub active_event: Option<String>,
    /// Roles allowed to manage the catalog
    pub admin_roles: AdminRoles,
    /// Discount rules in application order
    pub pricing: PricingEngine,
    /// Kits to upsert at startup
    pub kits: Vec<KitConfig>,
}

/// Reads a role id written either as a string or as a bare integer.
fn id_from_value(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        toml::Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

fn parse_admin_role(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::Table(table) => table.get("id").and_then(id_from_value),
        other => id_from_value(other),
    }
}

fn parse_discount(value: toml::Value) -> Option<DiscountRule> {
    let raw: RawDiscount = value.try_into().ok()?;
    let kind = match raw.kind.trim().to_ascii_lowercase().as_str() {
        "role" => DiscountKind::Role,
        "event" => DiscountKind::Event,
        _ => return None,
    };
    let target = id_from_value(&raw.target)?;
    if !raw.amount.is_finite() {
        return None;
    }
    Some(DiscountRule {
        kind,
        target,
        amount: raw.amount,
    })
}

fn kit_is_valid(kit: &KitConfig) -> bool {
    !kit.name.trim().is_empty()
        && kit
            .components
            .iter()
            .all(|c| c.kind.parse::<ComponentKind>().is_ok())
}

/// Parses and validates the contents of a config.toml file
///
/// # Errors
/// Returns an error only if the TOML syntax is invalid or a kit entry is missing
/// required fields. Bad admin roles, discounts and kits are skipped with a warning.
pub fn parse_shop_config(contents: &str) -> Result<ShopConfig> {
    let raw: RawShopConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    let mut admin_ids = Vec::with_capacity(raw.admin_roles.len());
    for (index, entry) in raw.admin_roles.iter().enumerate() {
        match parse_admin_role(entry) {
            Some(id) => admin_ids.push(id),
            None => warn!(index, ?entry, "Skipping malformed admin role entry"),
        }
    }

    let mut rules = Vec::with_capacity(raw.discounts.len());
    for (index, entry) in raw.discounts.into_iter().enumerate() {
        let shown = entry.to_string();
        match parse_discount(entry) {
            Some(rule) => rules.push(rule),
            None => warn!(index, entry = %shown, "Skipping malformed discount entry"),
        }
    }

    let kits: Vec<KitConfig> = raw
        .kits
        .into_iter()
        .filter(|kit| {
            let valid = kit_is_valid(kit);
            if !valid {
                warn!(kit = %kit.name, "Skipping kit with a blank name or unknown component kind");
            }
            valid
        })
        .collect();

    let active_event = raw
        .active_event
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    debug!(
        admin_roles = admin_ids.len(),
        discounts = rules.len(),
        kits = kits.len(),
        ?active_event,
        "Shop configuration parsed"
    );

    Ok(ShopConfig {
        active_event,
        admin_roles: AdminRoles::new(admin_ids),
        pricing: PricingEngine::new(rules),
        kits,
    })
}

/// Loads shop configuration from a TOML file
///
/// A missing file yields an empty configuration: no admin roles beyond guild
/// administrators, no discounts, no kits.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_shop_config<P: AsRef<Path>>(path: P) -> Result<ShopConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(?path, "Shop config file not found, starting with an empty configuration");
        return Ok(ShopConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_shop_config(&contents)
}

/// Loads shop configuration from `SHOP_CONFIG_PATH`, or ./config.toml by default
///
/// # Errors
/// Same as [`load_shop_config`].
pub fn load_default_config() -> Result<ShopConfig> {
    let path =
        std::env::var("SHOP_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_shop_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_shop_config() {
        let toml_str = r#"
            active_event = "summer"

            [[admin_roles]]
            id = "111"

            [[admin_roles]]
            id = 222

            [[discounts]]
            type = "role"
            target = "333"
            amount = 10

            [[discounts]]
            type = "event"
            target = "summer"
            amount = 25.5

            [[kits]]
            name = "Starter Kit"
            [kits.defaults]
            lvl = 150

            [[kits.components]]
            kind = "item"
            ref = "Pike"
            qty = 2

            [[kits.components]]
            kind = "dino"
            ref = "Raptor"
        "#;

        let config = parse_shop_config(toml_str).unwrap();

        assert_eq!(config.active_event.as_deref(), Some("summer"));
        assert!(config.admin_roles.contains("111"));
        assert!(config.admin_roles.contains("222"));

        let rules = config.pricing.rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].kind, DiscountKind::Role);
        assert_eq!(rules[0].amount, 10.0);
        assert_eq!(rules[1].kind, DiscountKind::Event);
        assert_eq!(rules[1].target, "summer");

        assert_eq!(config.kits.len(), 1);
        let kit = &config.kits[0];
        assert_eq!(kit.defaults.lvl, Some(150));
        assert_eq!(kit.components.len(), 2);
        assert_eq!(kit.components[0].reference, "Pike");
        assert_eq!(kit.components[0].qty, Some(2));
        assert_eq!(kit.components[1].kind, "dino");
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let toml_str = r#"
            admin_roles = ["444", { name = "no id" }, true]

            [[discounts]]
            type = "coupon"
            target = "x"
            amount = 10

            [[discounts]]
            type = "role"
            amount = 10

            [[discounts]]
            type = "role"
            target = "555"
            amount = "ten"

            [[discounts]]
            type = "Role"
            target = 555
            amount = 50

            [[kits]]
            name = "Potion Kit"
            [[kits.components]]
            kind = "potion"
            ref = "Health"
        "#;

        let config = parse_shop_config(toml_str).unwrap();

        assert_eq!(config.admin_roles.len(), 1);
        assert!(config.admin_roles.contains("444"));
        assert_eq!(config.pricing.rules().len(), 1);
        assert_eq!(config.pricing.rules()[0].target, "555");
        assert!(config.kits.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = parse_shop_config("").unwrap();
        assert!(config.admin_roles.is_empty());
        assert!(config.pricing.rules().is_empty());
        assert!(config.active_event.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = parse_shop_config("admin_roles = [");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let config = load_shop_config("definitely/not/here/config.toml").unwrap();
        assert!(config.kits.is_empty());
    }
}
