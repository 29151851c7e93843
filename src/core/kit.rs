//! Kit business logic - Bundles of items and dinos sold as one shop entry.
//!
//! Kits are usually defined in `config.toml` and upserted at startup. A kit's
//! component list is always replaced as a whole inside one database transaction,
//! so readers never see a half-written kit.

use crate::{
    config::shop::KitConfig,
    core::rcon::{KitComponent, KitDefaults},
    entities::{Kit, KitComponent as KitComponentEntity, kit, kit_component},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::OnConflict};
use tracing::{debug, info};

pub async fn get_kit_by_id(db: &DatabaseConnection, kit_id: i64) -> Result<Option<kit::Model>> {
    Kit::find_by_id(kit_id).one(db).await.map_err(Into::into)
}

pub async fn get_kit_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<kit::Model>> {
    Kit::find()
        .filter(kit::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists active kits alphabetically, at most `limit` rows.
pub async fn list_active_kits(db: &DatabaseConnection, limit: u64) -> Result<Vec<kit::Model>> {
    Kit::find()
        .filter(kit::Column::Active.eq(true))
        .order_by_asc(kit::Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns a kit's components in delivery order.
pub async fn get_kit_components(
    db: &DatabaseConnection,
    kit_id: i64,
) -> Result<Vec<KitComponent>> {
    let rows = KitComponentEntity::find()
        .filter(kit_component::Column::KitId.eq(kit_id))
        .order_by_asc(kit_component::Column::Position)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(KitComponent::from).collect())
}

/// Creates or updates a kit by name and replaces its component list.
///
/// The kit is (re)activated. Components keep the order they are given in.
///
/// # Errors
/// Returns an error if the name is blank or any statement fails; on failure
/// nothing is changed.
pub async fn upsert_kit(
    db: &DatabaseConnection,
    name: &str,
    defaults: &KitDefaults,
    components: &[KitComponent],
) -> Result<kit::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("kit name", "cannot be empty"));
    }

    let txn = db.begin().await?;

    let row = kit::ActiveModel {
        name: Set(name.to_string()),
        active: Set(true),
        default_qty: Set(defaults.qty),
        default_quality: Set(defaults.quality),
        default_is_bp: Set(defaults.is_bp),
        default_lvl: Set(defaults.lvl),
        default_breedable: Set(defaults.breedable),
        ..Default::default()
    };
    Kit::insert(row)
        .on_conflict(
            OnConflict::column(kit::Column::Name)
                .update_columns([
                    kit::Column::Active,
                    kit::Column::DefaultQty,
                    kit::Column::DefaultQuality,
                    kit::Column::DefaultIsBp,
                    kit::Column::DefaultLvl,
                    kit::Column::DefaultBreedable,
                ])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let saved = Kit::find()
        .filter(kit::Column::Name.eq(name))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Kit", name))?;

    KitComponentEntity::delete_many()
        .filter(kit_component::Column::KitId.eq(saved.id))
        .exec(&txn)
        .await?;

    for (position, component) in (0_i32..).zip(components) {
        kit_component::ActiveModel {
            kit_id: Set(saved.id),
            position: Set(position),
            kind: Set(component.kind.clone()),
            reference: Set(component.reference.clone()),
            player_id: Set(component.player_id),
            eos_id: Set(component.eos_id.clone()),
            qty: Set(component.qty),
            quality: Set(component.quality),
            lvl: Set(component.lvl),
            breedable: Set(component.breedable),
            is_bp: Set(component.is_bp),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok(saved)
}

/// Hides a kit from the wizard without touching existing shop items.
pub async fn deactivate_kit(db: &DatabaseConnection, kit_id: i64) -> Result<kit::Model> {
    let mut kit: kit::ActiveModel = Kit::find_by_id(kit_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Kit", kit_id))?
        .into();

    kit.active = Set(false);
    kit.update(db).await.map_err(Into::into)
}

/// Stops offering the kit with this name in the wizard.
///
/// Existing shop items built from the kit keep delivering. A kit still listed in
/// `config.toml` is reactivated by the next startup seed.
///
/// # Errors
/// Returns [`Error::NotFound`] if no kit has the name.
pub async fn deactivate_kit_by_name(db: &DatabaseConnection, name: &str) -> Result<kit::Model> {
    let kit = get_kit_by_name(db, name.trim())
        .await?
        .ok_or_else(|| Error::not_found("Kit", name))?;
    let saved = deactivate_kit(db, kit.id).await?;
    info!(kit = %saved.name, id = saved.id, "Kit deactivated");
    Ok(saved)
}

/// Upserts every kit from the shop configuration.
///
/// Kits missing from the configuration are left untouched so shop items that
/// reference them keep delivering.
///
/// # Errors
/// Returns an error on the first kit that fails to save; kits already saved stay.
pub async fn seed_kits(db: &DatabaseConnection, kits: &[KitConfig]) -> Result<usize> {
    info!("Seeding {} kits from configuration", kits.len());
    for config in kits {
        let saved = upsert_kit(db, &config.name, &config.defaults, &config.components).await?;
        debug!(kit = %saved.name, id = saved.id, components = config.components.len(), "Kit seeded");
    }
    Ok(kits.len())
}
