//! Shop item business logic - Live, priced catalog entries.
//!
//! A shop item is created from either a library item or a kit. [`NewShopItem`] is the
//! draft handed to the store; it is validated before any statement is sent, so a row
//! referencing both a library item and a kit never reaches the database.

use crate::{
    core::{
        kit,
        rcon::{self, DeliveryTarget, KitDefaults},
    },
    entities::{ShopItem, ShopItemKind, kit as kit_entity, library_item, shop_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Pricing fields collected from the operator, already parsed and range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingParams {
    pub price: i64,
    pub quantity: i32,
    pub quality: Option<i32>,
    pub is_blueprint: bool,
    pub buy_limit: Option<i32>,
}

/// A shop item that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShopItem {
    pub kind: ShopItemKind,
    pub library_id: Option<i64>,
    pub kit_id: Option<i64>,
    pub category_id: Option<i64>,
    pub name: String,
    pub blueprint_path: Option<String>,
    pub price: i64,
    pub quantity: i32,
    pub quality: Option<i32>,
    pub is_blueprint: bool,
    pub buy_limit: Option<i32>,
}

impl NewShopItem {
    /// Draft for selling one library item; name, category and blueprint are copied from it.
    #[must_use]
    pub fn single(item: &library_item::Model, params: PricingParams) -> Self {
        Self {
            kind: ShopItemKind::Single,
            library_id: Some(item.id),
            kit_id: None,
            category_id: Some(item.category_id),
            name: item.name.clone(),
            blueprint_path: item.blueprint_path.clone(),
            price: params.price,
            quantity: params.quantity,
            quality: params.quality,
            is_blueprint: params.is_blueprint,
            buy_limit: params.buy_limit,
        }
    }

    /// Draft for selling a kit. Item-only fields are dropped.
    #[must_use]
    pub fn kit(kit: &kit_entity::Model, params: PricingParams) -> Self {
        Self {
            kind: ShopItemKind::Kit,
            library_id: None,
            kit_id: Some(kit.id),
            category_id: None,
            name: kit.name.clone(),
            blueprint_path: None,
            price: params.price,
            quantity: params.quantity,
            quality: None,
            is_blueprint: false,
            buy_limit: params.buy_limit,
        }
    }

    /// Checks the reference invariants and value ranges.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.library_id.is_some() && self.kit_id.is_some() {
            return Err(Error::invalid(
                "references",
                "a shop item cannot reference both a library item and a kit",
            ));
        }
        match self.kind {
            ShopItemKind::Single if self.library_id.is_none() => {
                return Err(Error::invalid(
                    "library_id",
                    "a single item must reference a library item",
                ));
            }
            ShopItemKind::Kit if self.kit_id.is_none() => {
                return Err(Error::invalid("kit_id", "a kit item must reference a kit"));
            }
            ShopItemKind::Kit if self.category_id.is_some() => {
                return Err(Error::invalid(
                    "category_id",
                    "a kit item cannot belong to a category",
                ));
            }
            _ => {}
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid("name", "cannot be empty"));
        }
        if self.price < 0 {
            return Err(Error::invalid("price", "cannot be negative"));
        }
        if self.quantity < 1 {
            return Err(Error::invalid("quantity", "must be at least 1"));
        }
        if self.quality.is_some_and(|q| q < 0) {
            return Err(Error::invalid("quality", "cannot be negative"));
        }
        if self.buy_limit.is_some_and(|limit| limit < 1) {
            return Err(Error::invalid("buy limit", "must be a positive number"));
        }
        Ok(())
    }
}

/// Validates and inserts a new, active shop item.
///
/// Inserting is not idempotent: the same draft written twice yields two rows.
///
/// # Errors
/// Returns [`Error::InvalidInput`] before touching the store if the draft is invalid,
/// or [`Error::StoreUnavailable`] if the insert fails.
pub async fn create_shop_item(
    db: &DatabaseConnection,
    draft: NewShopItem,
) -> Result<shop_item::Model> {
    draft.validate()?;

    let now = chrono::Utc::now().naive_utc();
    let row = shop_item::ActiveModel {
        kind: Set(draft.kind),
        library_id: Set(draft.library_id),
        kit_id: Set(draft.kit_id),
        category_id: Set(draft.category_id),
        name: Set(draft.name.trim().to_string()),
        blueprint_path: Set(draft.blueprint_path),
        price: Set(draft.price),
        quantity: Set(draft.quantity),
        quality: Set(draft.quality),
        is_blueprint: Set(draft.is_blueprint),
        buy_limit: Set(draft.buy_limit),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let saved = row.insert(db).await?;
    info!(id = saved.id, name = %saved.name, kind = %saved.kind, "Shop item created");
    Ok(saved)
}

/// Lists active shop items alphabetically.
pub async fn get_active_shop_items(db: &DatabaseConnection) -> Result<Vec<shop_item::Model>> {
    ShopItem::find()
        .filter(shop_item::Column::Active.eq(true))
        .order_by_asc(shop_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds the first active shop item with this exact name.
pub async fn get_shop_item_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<shop_item::Model>> {
    ShopItem::find()
        .filter(shop_item::Column::Name.eq(name))
        .filter(shop_item::Column::Active.eq(true))
        .order_by_asc(shop_item::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Soft deletes every active shop item with this name and returns how many were hidden.
///
/// # Errors
/// Returns [`Error::NotFound`] if no active item has the name.
pub async fn deactivate_shop_item(db: &DatabaseConnection, name: &str) -> Result<u64> {
    let result = ShopItem::update_many()
        .col_expr(shop_item::Column::Active, Expr::value(false))
        .col_expr(
            shop_item::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(shop_item::Column::Name.eq(name))
        .filter(shop_item::Column::Active.eq(true))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found("Shop item", name));
    }
    Ok(result.rows_affected)
}

/// Hard deletes every shop item with this name and returns how many rows went away.
///
/// # Errors
/// Returns [`Error::NotFound`] if nothing matched.
pub async fn delete_shop_items_by_name(db: &DatabaseConnection, name: &str) -> Result<u64> {
    let result = ShopItem::delete_many()
        .filter(shop_item::Column::Name.eq(name))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found("Shop item", name));
    }
    Ok(result.rows_affected)
}

/// Builds the RCON commands that deliver one purchase of `item` to `target`.
///
/// Single items use the blueprint path (or the name when there is none). Kit items
/// repeat the kit's command sequence once per unit of `quantity`.
///
/// # Errors
/// Returns [`Error::NotFound`] if a kit item's kit is gone, or
/// [`Error::UnknownComponentKind`] if the kit holds an unrecognized component.
pub async fn delivery_commands(
    db: &DatabaseConnection,
    item: &shop_item::Model,
    target: &DeliveryTarget,
) -> Result<Vec<String>> {
    match item.kind {
        ShopItemKind::Single => {
            let identifier = item.blueprint_path.as_deref().unwrap_or(&item.name);
            Ok(vec![rcon::item_command(
                target.player_id.unwrap_or(1),
                identifier,
                item.quantity,
                item.quality.unwrap_or(1),
                item.is_blueprint,
            )])
        }
        ShopItemKind::Kit => {
            let kit_id = item
                .kit_id
                .ok_or_else(|| Error::not_found("Kit", &item.name))?;
            let kit = kit::get_kit_by_id(db, kit_id)
                .await?
                .ok_or_else(|| Error::not_found("Kit", kit_id))?;
            let components = kit::get_kit_components(db, kit_id).await?;
            let once = rcon::kit_commands(&components, target, &KitDefaults::from(&kit))?;

            let copies = usize::try_from(item.quantity.max(1)).unwrap_or(1);
            Ok(once.iter().cycle().take(once.len() * copies).cloned().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::rcon::KitComponent;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn params() -> PricingParams {
        PricingParams {
            price: 100,
            quantity: 1,
            quality: Some(100),
            is_blueprint: true,
            buy_limit: Some(3),
        }
    }

    fn draft() -> NewShopItem {
        NewShopItem {
            kind: ShopItemKind::Single,
            library_id: Some(1),
            kit_id: None,
            category_id: Some(1),
            name: "Rifle".to_string(),
            blueprint_path: Some("/bp/rifle".to_string()),
            price: 100,
            quantity: 1,
            quality: None,
            is_blueprint: false,
            buy_limit: None,
        }
    }

    #[tokio::test]
    async fn test_both_references_rejected_before_store() -> Result<()> {
        // A mock with no prepared results fails any statement that reaches it
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut both = draft();
        both.kit_id = Some(7);
        let result = create_shop_item(&db, both).await;

        assert!(matches!(
            result,
            Err(Error::InvalidInput {
                field: "references",
                ..
            })
        ));
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[test]
    fn test_validate_rules() {
        assert!(draft().validate().is_ok());

        let mut no_ref = draft();
        no_ref.library_id = None;
        assert!(no_ref.validate().is_err());

        let mut kit_with_category = draft();
        kit_with_category.kind = ShopItemKind::Kit;
        kit_with_category.library_id = None;
        kit_with_category.kit_id = Some(1);
        assert!(matches!(
            kit_with_category.validate(),
            Err(Error::InvalidInput {
                field: "category_id",
                ..
            })
        ));

        let mut zero_qty = draft();
        zero_qty.quantity = 0;
        assert!(zero_qty.validate().is_err());

        let mut negative_price = draft();
        negative_price.price = -1;
        assert!(negative_price.validate().is_err());

        let mut zero_limit = draft();
        zero_limit.buy_limit = Some(0);
        assert!(zero_limit.validate().is_err());
    }

    #[tokio::test]
    async fn test_create_single_shop_item() -> Result<()> {
        let (db, weapons, rifle) = setup_with_library_item().await?;

        let item = create_shop_item(&db, NewShopItem::single(&rifle, params())).await?;

        assert_eq!(item.kind, ShopItemKind::Single);
        assert_eq!(item.library_id, Some(rifle.id));
        assert_eq!(item.category_id, Some(weapons.id));
        assert_eq!(item.kit_id, None);
        assert_eq!(item.name, "Rifle");
        assert_eq!(item.blueprint_path.as_deref(), Some("/bp/rifle"));
        assert_eq!(item.price, 100);
        assert_eq!(item.quality, Some(100));
        assert!(item.is_blueprint);
        assert_eq!(item.buy_limit, Some(3));
        assert!(item.active);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_kit_shop_item_drops_item_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let kit = create_test_kit(&db, "Starter Kit").await?;

        let item = create_shop_item(&db, NewShopItem::kit(&kit, params())).await?;

        assert_eq!(item.kind, ShopItemKind::Kit);
        assert_eq!(item.kit_id, Some(kit.id));
        assert_eq!(item.library_id, None);
        assert_eq!(item.category_id, None);
        assert_eq!(item.quality, None);
        assert!(!item.is_blueprint);
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_and_delete_by_name() -> Result<()> {
        let (db, _weapons, rifle) = setup_with_library_item().await?;
        create_shop_item(&db, NewShopItem::single(&rifle, params())).await?;
        create_shop_item(&db, NewShopItem::single(&rifle, params())).await?;

        assert_eq!(get_active_shop_items(&db).await?.len(), 2);
        assert_eq!(deactivate_shop_item(&db, "Rifle").await?, 2);
        assert!(get_active_shop_items(&db).await?.is_empty());
        assert!(get_shop_item_by_name(&db, "Rifle").await?.is_none());
        assert!(matches!(
            deactivate_shop_item(&db, "Rifle").await,
            Err(Error::NotFound { .. })
        ));

        assert_eq!(delete_shop_items_by_name(&db, "Rifle").await?, 2);
        assert!(matches!(
            delete_shop_items_by_name(&db, "Rifle").await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_referenced_templates_cannot_be_deleted() -> Result<()> {
        use crate::entities::{Kit, LibraryItem};

        let (db, _weapons, rifle) = setup_with_library_item().await?;
        let kit = create_test_kit(&db, "Starter Kit").await?;
        let single = create_shop_item(&db, NewShopItem::single(&rifle, params())).await?;
        let bundle = create_shop_item(&db, NewShopItem::kit(&kit, params())).await?;

        assert!(LibraryItem::delete_by_id(rifle.id).exec(&db).await.is_err());
        assert!(Kit::delete_by_id(kit.id).exec(&db).await.is_err());

        let single_after = ShopItem::find_by_id(single.id).one(&db).await?.unwrap();
        assert_eq!(single_after.library_id, Some(rifle.id));
        assert!(single_after.active);
        let bundle_after = ShopItem::find_by_id(bundle.id).one(&db).await?.unwrap();
        assert_eq!(bundle_after.kit_id, Some(kit.id));
        assert_eq!(
            delivery_commands(&db, &bundle_after, &DeliveryTarget::default())
                .await?
                .len(),
            2
        );

        // Once the shop items are gone the templates can go too
        delete_shop_items_by_name(&db, "Rifle").await?;
        delete_shop_items_by_name(&db, "Starter Kit").await?;
        LibraryItem::delete_by_id(rifle.id).exec(&db).await?;
        Kit::delete_by_id(kit.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_commands_single() -> Result<()> {
        let (db, _weapons, rifle) = setup_with_library_item().await?;
        let item = create_shop_item(&db, NewShopItem::single(&rifle, params())).await?;
        let target = DeliveryTarget {
            player_id: Some(7),
            eos_id: None,
        };

        let cmds = delivery_commands(&db, &item, &target).await?;
        assert_eq!(cmds, vec!["giveitemtoplayer 7 /bp/rifle 1 100 1"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_commands_kit_repeats_per_quantity() -> Result<()> {
        let db = setup_test_db().await?;
        let kit = crate::core::kit::upsert_kit(
            &db,
            "Starter Kit",
            &KitDefaults::default(),
            &[KitComponent::item("Pike"), KitComponent::dino("Raptor")],
        )
        .await?;
        let mut kit_params = params();
        kit_params.quantity = 2;
        let item = create_shop_item(&db, NewShopItem::kit(&kit, kit_params)).await?;
        let target = DeliveryTarget {
            player_id: Some(7),
            eos_id: Some("eos1".to_string()),
        };

        let cmds = delivery_commands(&db, &item, &target).await?;

        assert_eq!(cmds.len(), 4);
        assert_eq!(cmds[0], "giveitemtoplayer 7 Pike 1 1 0");
        assert_eq!(
            cmds[1],
            "SpawnDinoinBall -p=eos1 -t=Raptor -l=225 -f=1 -i=1 -b=0 -h=1"
        );
        assert_eq!(cmds[2], cmds[0]);
        assert_eq!(cmds[3], cmds[1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_commands_kit_unknown_component() -> Result<()> {
        let db = setup_test_db().await?;
        let mut potion = KitComponent::item("Potion");
        potion.kind = "potion".to_string();
        let kit =
            crate::core::kit::upsert_kit(&db, "Bad Kit", &KitDefaults::default(), &[potion])
                .await?;
        let item = create_shop_item(&db, NewShopItem::kit(&kit, params())).await?;

        let result = delivery_commands(&db, &item, &DeliveryTarget::default()).await;
        assert!(matches!(result, Err(Error::UnknownComponentKind { .. })));
        Ok(())
    }
}
