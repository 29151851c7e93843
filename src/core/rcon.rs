//! RCON command synthesis - Turns catalog entries into game server console commands.
//!
//! Everything here is pure string construction. Sending the result to the server is
//! the delivery transport's job.

use crate::{
    entities::{kit, kit_component},
    errors::{Error, Result},
};
use serde::Deserialize;
use std::str::FromStr;

/// Delimiter used when a transport only accepts a single command string.
pub const DEFAULT_DELIMITER: &str = " | ";

const DEFAULT_QTY: i32 = 1;
const DEFAULT_QUALITY: i32 = 1;
const DEFAULT_IS_BP: bool = false;
const DEFAULT_LEVEL: i32 = 225;
const DEFAULT_BREEDABLE: bool = true;
const DEFAULT_PLAYER_ID: i64 = 1;

/// Builds a `giveitemtoplayer` command.
#[must_use]
pub fn item_command(
    player_id: i64,
    item_identifier: &str,
    qty: i32,
    quality: i32,
    is_blueprint: bool,
) -> String {
    let bp_flag = u8::from(is_blueprint);
    format!("giveitemtoplayer {player_id} {item_identifier} {qty} {quality} {bp_flag}")
}

/// Builds a `SpawnDinoinBall` command.
///
/// The `-b` flag is inverted relative to `breedable`: a breedable dino is spawned with `-b=0`.
#[must_use]
pub fn dino_command(target_id: &str, dino_identifier: &str, level: i32, breedable: bool) -> String {
    let breed_flag = u8::from(!breedable);
    format!(
        "SpawnDinoinBall -p={target_id} -t={dino_identifier} -l={level} -f=1 -i=1 -b={breed_flag} -h=1"
    )
}

/// The two component kinds a kit can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// An inventory item, delivered with [`item_command`]
    Item,
    /// A creature, delivered with [`dino_command`]
    Dino,
}

impl FromStr for ComponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "item" => Ok(Self::Item),
            "dino" => Ok(Self::Dino),
            _ => Err(Error::UnknownComponentKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// One entry of a kit, with optional per-component overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KitComponent {
    /// `"item"` or `"dino"`; kept as text so unknown kinds surface at synthesis
    pub kind: String,
    /// Item blueprint or dino class
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub player_id: Option<i64>,
    #[serde(default)]
    pub eos_id: Option<String>,
    #[serde(default)]
    pub qty: Option<i32>,
    #[serde(default)]
    pub quality: Option<i32>,
    #[serde(default)]
    pub lvl: Option<i32>,
    #[serde(default)]
    pub breedable: Option<bool>,
    #[serde(default)]
    pub is_bp: Option<bool>,
}

impl KitComponent {
    /// An item component with no overrides.
    #[must_use]
    pub fn item(reference: impl Into<String>) -> Self {
        Self::bare("item", reference)
    }

    /// A dino component with no overrides.
    #[must_use]
    pub fn dino(reference: impl Into<String>) -> Self {
        Self::bare("dino", reference)
    }

    fn bare(kind: &str, reference: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            reference: reference.into(),
            player_id: None,
            eos_id: None,
            qty: None,
            quality: None,
            lvl: None,
            breedable: None,
            is_bp: None,
        }
    }
}

impl From<kit_component::Model> for KitComponent {
    fn from(model: kit_component::Model) -> Self {
        Self {
            kind: model.kind,
            reference: model.reference,
            player_id: model.player_id,
            eos_id: model.eos_id,
            qty: model.qty,
            quality: model.quality,
            lvl: model.lvl,
            breedable: model.breedable,
            is_bp: model.is_bp,
        }
    }
}

/// Kit-level fallbacks for fields a component leaves unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct KitDefaults {
    #[serde(default)]
    pub qty: Option<i32>,
    #[serde(default)]
    pub quality: Option<i32>,
    #[serde(default)]
    pub is_bp: Option<bool>,
    #[serde(default)]
    pub lvl: Option<i32>,
    #[serde(default)]
    pub breedable: Option<bool>,
}

impl From<&kit::Model> for KitDefaults {
    fn from(kit: &kit::Model) -> Self {
        Self {
            qty: kit.default_qty,
            quality: kit.default_quality,
            is_bp: kit.default_is_bp,
            lvl: kit.default_lvl,
            breedable: kit.default_breedable,
        }
    }
}

/// Who receives a delivery: the in-game player id for items, the EOS id for dinos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub player_id: Option<i64>,
    pub eos_id: Option<String>,
}

fn component_command(
    component: &KitComponent,
    target: &DeliveryTarget,
    defaults: &KitDefaults,
) -> Result<String> {
    match component.kind.parse::<ComponentKind>()? {
        ComponentKind::Item => Ok(item_command(
            component
                .player_id
                .or(target.player_id)
                .unwrap_or(DEFAULT_PLAYER_ID),
            &component.reference,
            component.qty.or(defaults.qty).unwrap_or(DEFAULT_QTY),
            component
                .quality
                .or(defaults.quality)
                .unwrap_or(DEFAULT_QUALITY),
            component.is_bp.or(defaults.is_bp).unwrap_or(DEFAULT_IS_BP),
        )),
        ComponentKind::Dino => Ok(dino_command(
            component
                .eos_id
                .as_deref()
                .or(target.eos_id.as_deref())
                .unwrap_or_default(),
            &component.reference,
            component.lvl.or(defaults.lvl).unwrap_or(DEFAULT_LEVEL),
            component
                .breedable
                .or(defaults.breedable)
                .unwrap_or(DEFAULT_BREEDABLE),
        )),
    }
}

/// Builds one command per component, in component order.
///
/// # Errors
/// Returns [`Error::UnknownComponentKind`] if any component is neither `item` nor `dino`.
/// No partial list is returned: a kit is delivered whole or not at all.
pub fn kit_commands(
    components: &[KitComponent],
    target: &DeliveryTarget,
    defaults: &KitDefaults,
) -> Result<Vec<String>> {
    components
        .iter()
        .map(|component| component_command(component, target, defaults))
        .collect()
}

/// Joins [`kit_commands`] with `delimiter` for transports that take one string per call.
///
/// # Errors
/// Same as [`kit_commands`].
pub fn kit_command_string(
    components: &[KitComponent],
    target: &DeliveryTarget,
    defaults: &KitDefaults,
    delimiter: &str,
) -> Result<String> {
    Ok(kit_commands(components, target, defaults)?.join(delimiter))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_item_command() {
        assert_eq!(
            item_command(7, "Item_X", 3, 100, true),
            "giveitemtoplayer 7 Item_X 3 100 1"
        );
        assert_eq!(
            item_command(7, "Item_X", 1, 1, false),
            "giveitemtoplayer 7 Item_X 1 1 0"
        );
    }

    #[test]
    fn test_dino_command_breed_flag_is_inverted() {
        assert_eq!(
            dino_command("eos123", "Dino_Y", 150, true),
            "SpawnDinoinBall -p=eos123 -t=Dino_Y -l=150 -f=1 -i=1 -b=0 -h=1"
        );
        assert_eq!(
            dino_command("eos123", "Dino_Y", 150, false),
            "SpawnDinoinBall -p=eos123 -t=Dino_Y -l=150 -f=1 -i=1 -b=1 -h=1"
        );
    }

    #[test]
    fn test_kit_commands_preserves_order_and_hard_defaults() {
        let components = vec![
            KitComponent::dino("Raptor"),
            KitComponent::item("Pike"),
            KitComponent::item("Berry"),
        ];
        let target = DeliveryTarget {
            player_id: Some(42),
            eos_id: Some("eosABC".to_string()),
        };

        let cmds = kit_commands(&components, &target, &KitDefaults::default()).unwrap();

        assert_eq!(
            cmds,
            vec![
                "SpawnDinoinBall -p=eosABC -t=Raptor -l=225 -f=1 -i=1 -b=0 -h=1",
                "giveitemtoplayer 42 Pike 1 1 0",
                "giveitemtoplayer 42 Berry 1 1 0",
            ]
        );
    }

    #[test]
    fn test_kit_commands_override_precedence() {
        let mut pike = KitComponent::item("Pike");
        pike.qty = Some(5);
        pike.player_id = Some(9);
        let mut raptor = KitComponent::dino("Raptor");
        raptor.breedable = Some(false);

        let defaults = KitDefaults {
            qty: Some(2),
            quality: Some(50),
            is_bp: Some(true),
            lvl: Some(100),
            breedable: Some(true),
        };
        let target = DeliveryTarget {
            player_id: Some(42),
            eos_id: Some("eos1".to_string()),
        };

        let cmds = kit_commands(&[pike, raptor], &target, &defaults).unwrap();

        // Component value beats kit default, kit default beats hard default
        assert_eq!(cmds[0], "giveitemtoplayer 9 Pike 5 50 1");
        assert_eq!(
            cmds[1],
            "SpawnDinoinBall -p=eos1 -t=Raptor -l=100 -f=1 -i=1 -b=1 -h=1"
        );
    }

    #[test]
    fn test_kit_commands_missing_targets_fall_back() {
        let cmds = kit_commands(
            &[KitComponent::item("Pike"), KitComponent::dino("Raptor")],
            &DeliveryTarget::default(),
            &KitDefaults::default(),
        )
        .unwrap();

        assert_eq!(cmds[0], "giveitemtoplayer 1 Pike 1 1 0");
        assert_eq!(
            cmds[1],
            "SpawnDinoinBall -p= -t=Raptor -l=225 -f=1 -i=1 -b=0 -h=1"
        );
    }

    #[test]
    fn test_kit_commands_unknown_kind_fails() {
        let mut potion = KitComponent::item("Potion_Health");
        potion.kind = "potion".to_string();
        let components = vec![KitComponent::item("Pike"), potion];

        let result = kit_commands(&components, &DeliveryTarget::default(), &KitDefaults::default());

        assert!(matches!(
            result,
            Err(Error::UnknownComponentKind { kind }) if kind == "potion"
        ));
    }

    #[test]
    fn test_kit_command_string_joins() {
        let target = DeliveryTarget {
            player_id: Some(3),
            eos_id: None,
        };
        let joined = kit_command_string(
            &[KitComponent::item("A"), KitComponent::item("B")],
            &target,
            &KitDefaults::default(),
            DEFAULT_DELIMITER,
        )
        .unwrap();

        assert_eq!(
            joined,
            "giveitemtoplayer 3 A 1 1 0 | giveitemtoplayer 3 B 1 1 0"
        );
    }

    #[test]
    fn test_component_kind_parse_is_exact() {
        assert_eq!("item".parse::<ComponentKind>().unwrap(), ComponentKind::Item);
        assert_eq!("dino".parse::<ComponentKind>().unwrap(), ComponentKind::Dino);
        for kind in ["Item", "ITEM", " dino ", "DINO", ""] {
            assert!(matches!(
                kind.parse::<ComponentKind>(),
                Err(Error::UnknownComponentKind { .. })
            ));
        }
    }

    #[test]
    fn test_uppercase_kind_fails_whole_kit() {
        let mut shouting = KitComponent::item("Pike");
        shouting.kind = "ITEM".to_string();
        let result = kit_commands(
            &[KitComponent::item("Berry"), shouting],
            &DeliveryTarget::default(),
            &KitDefaults::default(),
        );
        assert!(matches!(
            result,
            Err(Error::UnknownComponentKind { kind }) if kind == "ITEM"
        ));
    }
}
