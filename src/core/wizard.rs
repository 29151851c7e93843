//! Catalog configuration wizard - The admin flow that turns selections into a shop item.
//!
//! The flow is a linear state machine:
//!
//! ```text
//! SelectKind ─single─▶ SelectCategory ─▶ SelectItem ─┐
//!      │                                             ├─▶ ConfigurePricing ─▶ Committed | Failed
//!      └────kit──────▶ SelectKit ────────────────────┘
//! ```
//!
//! Every transition consumes the current [`WizardState`] and returns the next one, and
//! a [`WizardSession`] owns exactly one state for one operator. Nothing here holds a
//! database connection between steps.

use crate::{
    core::{
        auth::{self, AdminRoles, Operator},
        catalog, kit,
        shop_item::{self, NewShopItem, PricingParams},
    },
    entities::{ShopItemKind, shop_item as shop_item_entity},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Maximum number of choices shown per step (Discord select menu limit).
pub const PAGE_SIZE: u64 = 25;

/// Idle time after which an unfinished wizard is discarded.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// What the wizard will write once pricing is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingTarget {
    /// Sell one library item
    LibraryItem { library_id: i64 },
    /// Sell a kit
    Kit { kit_id: i64 },
}

impl PricingTarget {
    #[must_use]
    pub const fn kind(self) -> ShopItemKind {
        match self {
            Self::LibraryItem { .. } => ShopItemKind::Single,
            Self::Kit { .. } => ShopItemKind::Kit,
        }
    }
}

/// The step a wizard is on.
#[derive(Debug)]
pub enum WizardState {
    SelectKind,
    SelectCategory,
    SelectItem { category_id: i64, page: u64 },
    SelectKit,
    ConfigurePricing { target: PricingTarget },
    Committed { item: shop_item_entity::Model },
    Failed { error: Error },
}

impl WizardState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed { .. } | Self::Failed { .. })
    }

    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectKind => "select kind",
            Self::SelectCategory => "select category",
            Self::SelectItem { .. } => "select item",
            Self::SelectKit => "select kit",
            Self::ConfigurePricing { .. } => "configure pricing",
            Self::Committed { .. } => "committed",
            Self::Failed { .. } => "failed",
        }
    }

    fn unexpected(&self, action: &str) -> Error {
        Error::invalid("step", format!("cannot {action} during '{}'", self.name()))
    }

    /// `SelectKind` → `SelectCategory` or `SelectKit`.
    ///
    /// # Errors
    /// Fails when called in any other state.
    pub fn choose_kind(self, kind: ShopItemKind) -> Result<Self> {
        match self {
            Self::SelectKind => Ok(match kind {
                ShopItemKind::Single => Self::SelectCategory,
                ShopItemKind::Kit => Self::SelectKit,
            }),
            other => Err(other.unexpected("choose a kind")),
        }
    }

    /// Picks the listed row with this id.
    ///
    /// `SelectCategory` → `SelectItem` (first page); `SelectItem` and `SelectKit` →
    /// `ConfigurePricing`.
    ///
    /// # Errors
    /// Fails when the current state has nothing to select.
    pub fn select(self, id: i64) -> Result<Self> {
        match self {
            Self::SelectCategory => Ok(Self::SelectItem {
                category_id: id,
                page: 0,
            }),
            Self::SelectItem { .. } => Ok(Self::ConfigurePricing {
                target: PricingTarget::LibraryItem { library_id: id },
            }),
            Self::SelectKit => Ok(Self::ConfigurePricing {
                target: PricingTarget::Kit { kit_id: id },
            }),
            other => Err(other.unexpected("select")),
        }
    }

    /// Moves the item list one page forward or back (never before page 0).
    ///
    /// # Errors
    /// Fails outside `SelectItem`.
    pub fn turn_page(self, forward: bool) -> Result<Self> {
        match self {
            Self::SelectItem { category_id, page } => Ok(Self::SelectItem {
                category_id,
                page: if forward {
                    page.saturating_add(1)
                } else {
                    page.saturating_sub(1)
                },
            }),
            other => Err(other.unexpected("change page")),
        }
    }
}

/// One selectable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

/// Raw text of the pricing form, exactly as the operator typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingInput {
    pub price: String,
    pub quantity: Option<String>,
    pub quality: Option<String>,
    pub is_blueprint: Option<String>,
    pub buy_limit: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_int<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| Error::invalid(field, format!("'{raw}' is not a whole number")))
}

fn parse_flag(field: &'static str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(Error::invalid(field, format!("'{raw}' is not true or false"))),
    }
}

impl PricingInput {
    /// Parses and range-checks the form for a shop item of `kind`.
    ///
    /// Quality and the blueprint flag only apply to single items.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] naming the first bad field.
    pub fn parse(&self, kind: ShopItemKind) -> Result<PricingParams> {
        let price_raw = self.price.trim();
        if price_raw.is_empty() {
            return Err(Error::invalid("price", "is required"));
        }
        let price: i64 = parse_int("price", price_raw)?;
        if price < 1 {
            return Err(Error::invalid("price", "must be a positive number"));
        }

        let quantity = match non_blank(self.quantity.as_ref()) {
            Some(raw) => parse_int::<i32>("quantity", raw)?,
            None => 1,
        };
        if quantity < 1 {
            return Err(Error::invalid("quantity", "must be at least 1"));
        }

        let quality = non_blank(self.quality.as_ref())
            .map(|raw| parse_int::<i32>("quality", raw))
            .transpose()?;
        if quality.is_some_and(|q| q < 0) {
            return Err(Error::invalid("quality", "cannot be negative"));
        }

        let is_blueprint = non_blank(self.is_blueprint.as_ref())
            .map(|raw| parse_flag("blueprint flag", raw))
            .transpose()?;

        let buy_limit = non_blank(self.buy_limit.as_ref())
            .map(|raw| parse_int::<i32>("buy limit", raw))
            .transpose()?;
        if buy_limit.is_some_and(|limit| limit < 1) {
            return Err(Error::invalid("buy limit", "must be a positive number"));
        }

        if kind == ShopItemKind::Kit {
            if quality.is_some() {
                return Err(Error::invalid("quality", "only applies to single items"));
            }
            if is_blueprint == Some(true) {
                return Err(Error::invalid(
                    "blueprint flag",
                    "only applies to single items",
                ));
            }
        }

        Ok(PricingParams {
            price,
            quantity,
            quality,
            is_blueprint: is_blueprint.unwrap_or(false),
            buy_limit,
        })
    }
}

/// One operator's run through the wizard.
///
/// Sessions are independent values; two admins running the wizard at once each own
/// their own session. Terminal states are sticky, so repeating a submit on a
/// committed session never writes a second row.
#[derive(Debug)]
pub struct WizardSession {
    key: u64,
    state: WizardState,
    idle_timeout: Duration,
    last_activity: Instant,
}

impl WizardSession {
    /// Starts a wizard at `SelectKind` if the operator may manage the shop.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`]; no session exists in that case.
    pub fn start(
        key: u64,
        operator: &Operator,
        admin_roles: &AdminRoles,
        idle_timeout: Duration,
    ) -> Result<Self> {
        auth::authorize(operator, admin_roles)?;
        debug!(key, "Shop wizard started");
        Ok(Self {
            key,
            state: WizardState::SelectKind,
            idle_timeout,
            last_activity: Instant::now(),
        })
    }

    #[must_use]
    pub const fn key(&self) -> u64 {
        self.key
    }

    #[must_use]
    pub const fn state(&self) -> &WizardState {
        &self.state
    }

    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.last_activity.elapsed() >= self.idle_timeout
    }

    /// Consumes the session, returning the committed shop item if there is one.
    #[must_use]
    pub fn into_committed(self) -> Option<shop_item_entity::Model> {
        match self.state {
            WizardState::Committed { item } => Some(item),
            _ => None,
        }
    }

    fn fail(&mut self, error: Error) {
        warn!(key = self.key, step = self.state.name(), %error, "Shop wizard failed");
        self.state = WizardState::Failed { error };
    }

    /// Runs one synchronous transition, enforcing expiry and sticky terminal states.
    fn advance(&mut self, step: impl FnOnce(WizardState) -> Result<WizardState>) -> &WizardState {
        if self.state.is_terminal() {
            return &self.state;
        }
        if self.is_expired() {
            self.fail(Error::SessionExpired);
            return &self.state;
        }
        let current = std::mem::replace(&mut self.state, WizardState::SelectKind);
        match step(current) {
            Ok(next) => {
                debug!(key = self.key, step = next.name(), "Shop wizard advanced");
                self.state = next;
                self.last_activity = Instant::now();
            }
            Err(error) => self.fail(error),
        }
        &self.state
    }

    pub fn choose_kind(&mut self, kind: ShopItemKind) -> &WizardState {
        self.advance(|state| state.choose_kind(kind))
    }

    pub fn select(&mut self, id: i64) -> &WizardState {
        self.advance(|state| state.select(id))
    }

    pub fn next_page(&mut self) -> &WizardState {
        self.advance(|state| state.turn_page(true))
    }

    pub fn previous_page(&mut self) -> &WizardState {
        self.advance(|state| state.turn_page(false))
    }

    /// Lists the rows the operator can pick from at the current step.
    ///
    /// Empty for steps that take no selection.
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn choices(&self, db: &DatabaseConnection) -> Result<Vec<Choice>> {
        let choices = match &self.state {
            WizardState::SelectCategory => catalog::list_categories(db, "", PAGE_SIZE)
                .await?
                .into_iter()
                .map(|c| Choice {
                    id: c.id,
                    label: c.name,
                })
                .collect(),
            WizardState::SelectItem { category_id, page } => {
                catalog::list_items_by_category(db, *category_id, PAGE_SIZE, page * PAGE_SIZE)
                    .await?
                    .into_iter()
                    .map(|item| Choice {
                        id: item.id,
                        label: item.name,
                    })
                    .collect()
            }
            WizardState::SelectKit => kit::list_active_kits(db, PAGE_SIZE)
                .await?
                .into_iter()
                .map(|k| Choice {
                    id: k.id,
                    label: k.name,
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(choices)
    }

    /// Whether the item list has rows beyond the current page.
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn has_next_page(&self, db: &DatabaseConnection) -> Result<bool> {
        match &self.state {
            WizardState::SelectItem { category_id, page } => {
                let total = catalog::count_items_in_category(db, *category_id).await?;
                Ok(total > (page + 1) * PAGE_SIZE)
            }
            _ => Ok(false),
        }
    }

    /// Parses the pricing form, re-reads the chosen row and writes the shop item.
    ///
    /// Ends in `Committed` or `Failed`. A missing library item or kit fails with
    /// [`Error::NotFound`] instead of writing anything.
    pub async fn submit(
        &mut self,
        db: &DatabaseConnection,
        input: &PricingInput,
    ) -> &WizardState {
        if self.state.is_terminal() {
            return &self.state;
        }
        if self.is_expired() {
            self.fail(Error::SessionExpired);
            return &self.state;
        }
        let WizardState::ConfigurePricing { target } = self.state else {
            let error = self.state.unexpected("submit pricing");
            self.fail(error);
            return &self.state;
        };

        match commit(db, target, input).await {
            Ok(item) => {
                info!(key = self.key, item_id = item.id, name = %item.name, "Shop wizard committed");
                self.state = WizardState::Committed { item };
                self.last_activity = Instant::now();
            }
            Err(error) => self.fail(error),
        }
        &self.state
    }
}

async fn commit(
    db: &DatabaseConnection,
    target: PricingTarget,
    input: &PricingInput,
) -> Result<shop_item_entity::Model> {
    let params = input.parse(target.kind())?;

    let draft = match target {
        PricingTarget::LibraryItem { library_id } => {
            let item = catalog::get_library_item_by_id(db, library_id)
                .await?
                .ok_or_else(|| Error::not_found("Library item", library_id))?;
            NewShopItem::single(&item, params)
        }
        PricingTarget::Kit { kit_id } => {
            let kit = kit::get_kit_by_id(db, kit_id)
                .await?
                .ok_or_else(|| Error::not_found("Kit", kit_id))?;
            NewShopItem::kit(&kit, params)
        }
    };

    shop_item::create_shop_item(db, draft).await
}
