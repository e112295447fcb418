//! Pure state transition function

use super::{ConvContext, ConvState, Effect, Event, Reply, ServedOffer};
use crate::actions::BotAction;
use crate::i18n::{messages, Language, GREETING};
use crate::route;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A search is already in progress")]
    SearchInProgress,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; all I/O is
/// described by the returned effects.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let msgs = messages(context.language);

    match (state, event) {
        // ============================================================
        // Commands (valid in every state)
        // ============================================================

        (_, Event::Start) => Ok(TransitionResult::new(ConvState::AwaitingLanguage)
            .with_effect(Effect::Reply(language_picker()))),

        (_, Event::Help) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::reply(msgs.help)))
        }

        (_, Event::MyTicket) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::LookupTicket))
        }

        (_, Event::TicketLoaded { ticket }) => {
            let text = match ticket {
                Some(ticket) => format!("{}{ticket}", msgs.your_ticket),
                None => msgs.no_ticket.to_string(),
            };
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::reply(text)))
        }

        // ============================================================
        // Language selection
        // ============================================================

        (_, Event::ActionSelected(BotAction::SelectLanguage { language })) => {
            Ok(TransitionResult::new(ConvState::AwaitingRoute)
                .with_effect(Effect::StoreLanguage { language })
                .with_effect(Effect::reply(messages(language).ask_route)))
        }

        // ============================================================
        // Route entry
        // ============================================================

        (ConvState::SearchingOffers { .. }, Event::Text { .. }) => {
            Err(TransitionError::SearchInProgress)
        }

        (_, Event::Text { text }) => match route::parse(&text) {
            Ok(query) => Ok(TransitionResult::new(ConvState::SearchingOffers {
                query: query.clone(),
            })
            .with_effect(Effect::ExpirePurchaseActions)
            .with_effect(Effect::ResolveOffers { query })),
            // Format errors leave the state alone so earlier buttons stay usable
            Err(_) => Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::reply_markdown(msgs.invalid_format))),
        },

        (ConvState::SearchingOffers { .. }, Event::OffersResolved { offers }) => {
            if offers.is_empty() {
                return Ok(TransitionResult::new(ConvState::AwaitingRoute)
                    .with_effect(Effect::reply(msgs.no_flights)));
            }

            let served = offers.iter().map(ServedOffer::from).collect();
            let replies = offers.into_iter().map(|offer| {
                let reply = Reply::text(offer.render(context.language));
                let reply = offer
                    .actions
                    .into_iter()
                    .fold(reply, |reply, a| reply.with_button(a.label, a.action));
                Effect::Reply(reply)
            });

            Ok(TransitionResult::new(ConvState::AwaitingSelection { served }).with_effects(replies))
        }

        (ConvState::SearchingOffers { .. }, Event::CatalogUnavailable { .. }) => {
            Ok(TransitionResult::new(ConvState::AwaitingRoute)
                .with_effect(Effect::reply(msgs.catalog_unavailable)))
        }

        // ============================================================
        // Offer selection
        // ============================================================

        (
            ConvState::AwaitingSelection { .. },
            Event::ActionSelected(BotAction::PurchaseOffer {
                agency,
                flight_number,
            }),
        ) if state.serves(&agency, &flight_number) => {
            let link = context.purchase.link(&agency, &flight_number);
            Ok(TransitionResult::new(ConvState::AwaitingRoute)
                .with_effect(Effect::RecordPurchase {
                    agency,
                    flight_number,
                })
                .with_effect(Effect::reply_markdown(format!(
                    "🔗 [{}]({link})",
                    msgs.click_to_buy
                )))
                .with_effect(Effect::reply(msgs.thank_you)))
        }

        // Not part of the list the user was shown
        (
            _,
            Event::ActionSelected(BotAction::PurchaseOffer { .. }) | Event::UnknownAction { .. },
        ) => {
            Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::reply(msgs.selection_expired)))
        }

        // ============================================================
        // Effect results arriving in the wrong state
        // ============================================================

        (state, event @ (Event::OffersResolved { .. } | Event::CatalogUnavailable { .. })) => {
            Err(TransitionError::InvalidTransition(format!(
                "{event:?} in state {}",
                state.name()
            )))
        }
    }
}

/// Bilingual greeting with one button per language
fn language_picker() -> Reply {
    Language::ALL.into_iter().fold(Reply::text(GREETING), |reply, language| {
        reply.with_button(
            language.button_label(),
            BotAction::SelectLanguage { language },
        )
    })
}
