//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are best effort: a store failure yields an empty list rather than
//! an error, since Discord gives autocomplete no way to surface one.

use crate::{
    bot::Context,
    core::{kit, shop_item},
};

/// Discord's cap on autocomplete suggestions
const MAX_SUGGESTIONS: usize = 25;
/// Kits scanned per keystroke before name filtering
const KIT_SCAN_LIMIT: u64 = 500;

fn matching_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.dedup();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Provides autocomplete suggestions for active shop item names.
///
/// Returns the bare name so it matches command parameters exactly.
pub async fn autocomplete_shop_item_name(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let db = &ctx.data().database;
    let Ok(items) = shop_item::get_active_shop_items(db).await else {
        return Vec::new();
    };
    matching_names(items.into_iter().map(|item| item.name), partial)
}

/// Provides autocomplete suggestions for active kit names.
pub async fn autocomplete_kit_name(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let db = &ctx.data().database;
    let Ok(kits) = kit::list_active_kits(db, KIT_SCAN_LIMIT).await else {
        return Vec::new();
    };
    matching_names(kits.into_iter().map(|k| k.name), partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names_filters_sorts_and_caps() {
        let names = (0..40).map(|i| format!("Item {i:02}"));
        let matched = matching_names(names, "item");
        assert_eq!(matched.len(), MAX_SUGGESTIONS);
        assert_eq!(matched[0], "Item 00");

        let matched = matching_names(
            vec!["Rifle".to_string(), "Pike".to_string(), "rifle scope".to_string()],
            "RIF",
        );
        assert_eq!(matched, vec!["Rifle".to_string(), "rifle scope".to_string()]);
    }
}
