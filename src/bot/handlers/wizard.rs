//! Discord rendering for the add-item wizard.
//!
//! Drives a [`WizardSession`] with buttons, string select menus and a modal. Every
//! custom id carries the invocation id, and the collector only accepts interactions
//! from the invoking admin, so concurrent wizards never see each other's clicks.
//! The session lives on this task's stack; when the collector times out it is
//! dropped together with whatever was selected so far.

use crate::{
    bot::{Context, operator_for},
    core::wizard::{Choice, PricingInput, WizardSession, WizardState},
    entities::ShopItemKind,
    errors::Result,
};
use poise::{CreateReply, serenity_prelude as serenity};
use tracing::{debug, instrument};

const ID_PREFIX: &str = "shopwiz";
const ACTION_SINGLE: &str = "single";
const ACTION_KIT: &str = "kit";
const ACTION_SELECT: &str = "select";
const ACTION_PREV: &str = "prev";
const ACTION_NEXT: &str = "next";
const MAX_LABEL_LEN: usize = 100;
const EXPIRED_MESSAGE: &str = "⌛ This shop wizard expired. Run `/shop_manage add` to start over.";

/// Pricing form for a single library item.
#[derive(Debug, poise::Modal)]
#[name = "Configure Shop Item"]
struct ItemPricingModal {
    #[name = "Price (points)"]
    #[placeholder = "e.g., 100"]
    price: String,
    #[name = "Quantity"]
    #[placeholder = "1"]
    quantity: Option<String>,
    #[name = "Quality (optional)"]
    #[placeholder = "e.g., 100"]
    quality: Option<String>,
    #[name = "Is Blueprint? (true/false)"]
    #[placeholder = "false"]
    is_blueprint: Option<String>,
    #[name = "Buy Limit (optional)"]
    #[placeholder = "e.g., 3"]
    buy_limit: Option<String>,
}

impl From<ItemPricingModal> for PricingInput {
    fn from(modal: ItemPricingModal) -> Self {
        Self {
            price: modal.price,
            quantity: modal.quantity,
            quality: modal.quality,
            is_blueprint: modal.is_blueprint,
            buy_limit: modal.buy_limit,
        }
    }
}

/// Pricing form for a kit; quality and blueprint do not apply.
#[derive(Debug, poise::Modal)]
#[name = "Configure Shop Kit"]
struct KitPricingModal {
    #[name = "Price (points)"]
    #[placeholder = "e.g., 500"]
    price: String,
    #[name = "Quantity (kit copies)"]
    #[placeholder = "1"]
    quantity: Option<String>,
    #[name = "Buy Limit (optional)"]
    #[placeholder = "e.g., 1"]
    buy_limit: Option<String>,
}

impl From<KitPricingModal> for PricingInput {
    fn from(modal: KitPricingModal) -> Self {
        Self {
            price: modal.price,
            quantity: modal.quantity,
            buy_limit: modal.buy_limit,
            ..Self::default()
        }
    }
}

fn custom_id(key: u64, action: &str) -> String {
    format!("{ID_PREFIX}:{key}:{action}")
}

fn action_of(custom_id: &str) -> &str {
    custom_id.rsplit(':').next().unwrap_or_default()
}

fn kind_row(key: u64) -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(custom_id(key, ACTION_SINGLE))
            .label("Single item")
            .style(serenity::ButtonStyle::Primary),
        serenity::CreateButton::new(custom_id(key, ACTION_KIT))
            .label("Kit")
            .style(serenity::ButtonStyle::Secondary),
    ])
}

fn truncate_label(label: &str) -> String {
    label.chars().take(MAX_LABEL_LEN).collect()
}

fn choice_rows(
    key: u64,
    placeholder: &str,
    choices: &[Choice],
    paging: Option<(bool, bool)>,
) -> Vec<serenity::CreateActionRow> {
    let options = choices
        .iter()
        .map(|choice| {
            serenity::CreateSelectMenuOption::new(
                truncate_label(&choice.label),
                choice.id.to_string(),
            )
        })
        .collect();
    let menu = serenity::CreateSelectMenu::new(
        custom_id(key, ACTION_SELECT),
        serenity::CreateSelectMenuKind::String { options },
    )
    .placeholder(placeholder);

    let mut rows = vec![serenity::CreateActionRow::SelectMenu(menu)];
    if let Some((has_previous, has_next)) = paging {
        rows.push(serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(custom_id(key, ACTION_PREV))
                .label("◀ Previous")
                .style(serenity::ButtonStyle::Secondary)
                .disabled(!has_previous),
            serenity::CreateButton::new(custom_id(key, ACTION_NEXT))
                .label("Next ▶")
                .style(serenity::ButtonStyle::Secondary)
                .disabled(!has_next),
        ]));
    }
    rows
}

/// What a component interaction asks the wizard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardAction {
    Kind(ShopItemKind),
    Select(i64),
    NextPage,
    PreviousPage,
}

/// Maps a component interaction onto a wizard action.
///
/// `None` means the interaction carries nothing the wizard understands (an unknown
/// action or an unparsable select value); it still has to be answered.
fn parse_action(
    custom_id: &str,
    data: &serenity::ComponentInteractionDataKind,
) -> Option<WizardAction> {
    match action_of(custom_id) {
        ACTION_SINGLE => Some(WizardAction::Kind(ShopItemKind::Single)),
        ACTION_KIT => Some(WizardAction::Kind(ShopItemKind::Kit)),
        ACTION_NEXT => Some(WizardAction::NextPage),
        ACTION_PREV => Some(WizardAction::PreviousPage),
        ACTION_SELECT => match data {
            serenity::ComponentInteractionDataKind::StringSelect { values } => values
                .first()
                .and_then(|v| v.parse().ok())
                .map(WizardAction::Select),
            _ => None,
        },
        _ => None,
    }
}

async fn update_message(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
    content: impl Into<String>,
    components: Vec<serenity::CreateActionRow>,
) -> Result<()> {
    interaction
        .create_response(
            ctx.serenity_context(),
            serenity::CreateInteractionResponse::UpdateMessage(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .components(components),
            ),
        )
        .await?;
    Ok(())
}

/// Answers an interaction that changes nothing, so Discord does not report it as failed.
async fn acknowledge(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
) -> Result<()> {
    interaction
        .create_response(
            ctx.serenity_context(),
            serenity::CreateInteractionResponse::Acknowledge,
        )
        .await?;
    Ok(())
}

/// Text and components for a selection step, or `None` if there is nothing to pick.
async fn render_selection(
    ctx: Context<'_>,
    session: &WizardSession,
) -> Result<Option<(String, Vec<serenity::CreateActionRow>)>> {
    let db = &ctx.data().database;
    let choices = session.choices(db).await?;
    if choices.is_empty() {
        return Ok(None);
    }
    let key = session.key();

    let rendered = match session.state() {
        WizardState::SelectCategory => (
            "Select a category:".to_string(),
            choice_rows(key, "Choose a category…", &choices, None),
        ),
        WizardState::SelectItem { page, .. } => {
            let has_next = session.has_next_page(db).await?;
            (
                format!("Select an item (page {}):", page + 1),
                choice_rows(
                    key,
                    "Choose an item…",
                    &choices,
                    Some((*page > 0, has_next)),
                ),
            )
        }
        WizardState::SelectKit => (
            "Select a kit:".to_string(),
            choice_rows(key, "Choose a kit…", &choices, None),
        ),
        _ => return Ok(None),
    };
    Ok(Some(rendered))
}

fn outcome_message(state: &WizardState) -> String {
    match state {
        WizardState::Committed { item } => format!(
            "✅ Added **{}** to the shop (price {}, qty {}).",
            item.name, item.price, item.quantity
        ),
        WizardState::Failed { error } => format!("❌ {error}"),
        other => format!("❌ The wizard stopped unexpectedly at '{}'.", other.name()),
    }
}

/// Opens the pricing modal on `interaction` and waits for the operator to submit it.
async fn collect_pricing(
    ctx: Context<'_>,
    interaction: serenity::ComponentInteraction,
    kind: ShopItemKind,
    session: &WizardSession,
) -> Result<Option<PricingInput>> {
    let timeout = Some(session.idle_timeout());
    let input = match kind {
        ShopItemKind::Single => {
            poise::execute_modal_on_component_interaction::<ItemPricingModal>(
                ctx,
                interaction,
                None,
                timeout,
            )
            .await?
            .map(PricingInput::from)
        }
        ShopItemKind::Kit => poise::execute_modal_on_component_interaction::<KitPricingModal>(
            ctx,
            interaction,
            None,
            timeout,
        )
        .await?
        .map(PricingInput::from),
    };
    Ok(input)
}

/// Runs the add-item wizard for the invoking member.
///
/// Unauthorized members get an ephemeral refusal and no session is created.
#[instrument(skip(ctx), fields(key = ctx.id()))]
pub async fn run_add_wizard(ctx: Context<'_>) -> Result<()> {
    let data = ctx.data();
    let operator = operator_for(ctx).await;

    let mut session = match WizardSession::start(
        ctx.id(),
        &operator,
        &data.shop.admin_roles,
        data.wizard_timeout,
    ) {
        Ok(session) => session,
        Err(error) => {
            ctx.send(
                CreateReply::default()
                    .content(format!("❌ {error}"))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };
    let key = session.key();
    let prefix = format!("{ID_PREFIX}:{key}:");

    let reply = ctx
        .send(
            CreateReply::default()
                .content("What do you want to add to the shop?")
                .components(vec![kind_row(key)])
                .ephemeral(true),
        )
        .await?;

    loop {
        let filter_prefix = prefix.clone();
        let Some(interaction) = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
            .author_id(ctx.author().id)
            .timeout(session.idle_timeout())
            .filter(move |mci| mci.data.custom_id.starts_with(&filter_prefix))
            .await
        else {
            debug!(key, step = session.state().name(), "Shop wizard timed out");
            reply
                .edit(
                    ctx,
                    CreateReply::default()
                        .content(EXPIRED_MESSAGE)
                        .components(Vec::new()),
                )
                .await?;
            return Ok(());
        };

        let Some(action) = parse_action(&interaction.data.custom_id, &interaction.data.kind) else {
            acknowledge(ctx, &interaction).await?;
            continue;
        };
        match action {
            WizardAction::Kind(kind) => session.choose_kind(kind),
            WizardAction::Select(id) => session.select(id),
            WizardAction::NextPage => session.next_page(),
            WizardAction::PreviousPage => session.previous_page(),
        };

        if let WizardState::ConfigurePricing { target } = session.state() {
            let kind = target.kind();
            let Some(input) = collect_pricing(ctx, interaction, kind, &session).await? else {
                reply
                    .edit(
                        ctx,
                        CreateReply::default()
                            .content(EXPIRED_MESSAGE)
                            .components(Vec::new()),
                    )
                    .await?;
                return Ok(());
            };
            let outcome = outcome_message(session.submit(&data.database, &input).await);
            reply
                .edit(
                    ctx,
                    CreateReply::default().content(outcome).components(Vec::new()),
                )
                .await?;
            return Ok(());
        }

        if session.state().is_terminal() {
            update_message(ctx, &interaction, outcome_message(session.state()), Vec::new())
                .await?;
            return Ok(());
        }

        if let Some((content, components)) = render_selection(ctx, &session).await? {
            update_message(ctx, &interaction, content, components).await?;
        } else {
            update_message(
                ctx,
                &interaction,
                "Nothing to choose from here yet. Add library items with `/shop_manage library` first.",
                Vec::new(),
            )
            .await?;
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_ids_are_scoped_per_session() {
        let a = custom_id(1, ACTION_SELECT);
        let b = custom_id(2, ACTION_SELECT);
        assert_ne!(a, b);
        assert!(a.starts_with("shopwiz:1:"));
        assert_eq!(action_of(&a), ACTION_SELECT);
    }

    #[test]
    fn test_truncate_label() {
        let long = "x".repeat(150);
        assert_eq!(truncate_label(&long).chars().count(), MAX_LABEL_LEN);
        assert_eq!(truncate_label("Rifle"), "Rifle");
    }

    #[test]
    fn test_parse_action() {
        let button = serenity::ComponentInteractionDataKind::Button;
        assert_eq!(
            parse_action(&custom_id(4, ACTION_KIT), &button),
            Some(WizardAction::Kind(ShopItemKind::Kit))
        );
        assert_eq!(
            parse_action(&custom_id(4, ACTION_NEXT), &button),
            Some(WizardAction::NextPage)
        );

        let picked = serenity::ComponentInteractionDataKind::StringSelect {
            values: vec!["17".to_string()],
        };
        assert_eq!(
            parse_action(&custom_id(4, ACTION_SELECT), &picked),
            Some(WizardAction::Select(17))
        );
    }

    #[test]
    fn test_unrecognized_interactions_have_no_action() {
        let button = serenity::ComponentInteractionDataKind::Button;
        assert_eq!(parse_action(&custom_id(4, "refund"), &button), None);
        assert_eq!(parse_action(&custom_id(4, ACTION_SELECT), &button), None);

        let garbage = serenity::ComponentInteractionDataKind::StringSelect {
            values: vec!["not-an-id".to_string()],
        };
        assert_eq!(parse_action(&custom_id(4, ACTION_SELECT), &garbage), None);

        let empty = serenity::ComponentInteractionDataKind::StringSelect { values: Vec::new() };
        assert_eq!(parse_action(&custom_id(4, ACTION_SELECT), &empty), None);
    }

    #[test]
    fn test_kit_modal_leaves_item_fields_empty() {
        let input = PricingInput::from(KitPricingModal {
            price: "500".to_string(),
            quantity: None,
            buy_limit: Some("1".to_string()),
        });
        assert_eq!(input.price, "500");
        assert!(input.quality.is_none());
        assert!(input.is_blueprint.is_none());
    }
}
