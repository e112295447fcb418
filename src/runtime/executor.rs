//! User runtime executor

use super::traits::{CitySource, FlightSource, SessionStore};
use super::{Inbound, OutboundButton, OutboundMessage, Request};

use crate::actions::ActionRegistry;
use crate::catalog::{find_offers, CatalogFilter};
use crate::i18n::messages;
use crate::presenter::present;
use crate::route::RouteQuery;
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event, Reply};
use tokio::sync::mpsc;

/// Conversation runtime for one user, generic over its I/O
pub struct UserRuntime<C, F, S>
where
    C: CitySource + 'static,
    F: FlightSource + 'static,
    S: SessionStore + 'static,
{
    context: ConvContext,
    state: ConvState,
    cities: C,
    flights: F,
    sessions: S,
    catalog_filter: CatalogFilter,
    /// Tokens for every button this user has been shown
    actions: ActionRegistry,
    request_rx: mpsc::Receiver<Request>,
    /// Replies produced while handling the current request
    outbox: Vec<OutboundMessage>,
}

impl<C, F, S> UserRuntime<C, F, S>
where
    C: CitySource + 'static,
    F: FlightSource + 'static,
    S: SessionStore + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: ConvContext,
        state: ConvState,
        cities: C,
        flights: F,
        sessions: S,
        catalog_filter: CatalogFilter,
        request_rx: mpsc::Receiver<Request>,
    ) -> Self {
        Self {
            context,
            state,
            cities,
            flights,
            sessions,
            catalog_filter,
            actions: ActionRegistry::new(),
            request_rx,
            outbox: Vec::new(),
        }
    }

    pub async fn run(mut self) {
        tracing::info!(user_id = %self.context.user_id, "Starting user runtime");

        // Process requests in a loop - no recursion
        while let Some(Request { inbound, reply_tx }) = self.request_rx.recv().await {
            let replies = self.handle(inbound).await;
            if reply_tx.send(replies).is_err() {
                tracing::debug!(
                    user_id = %self.context.user_id,
                    "Caller went away before replies were ready"
                );
            }
        }

        tracing::info!(user_id = %self.context.user_id, "User runtime stopped");
    }

    async fn handle(&mut self, inbound: Inbound) -> Vec<OutboundMessage> {
        self.context.language = self.sessions.get_language(&self.context.user_id).await;

        let event = match inbound {
            Inbound::Event(event) => event,
            Inbound::Callback { payload } => match self.actions.resolve(&payload) {
                Some(action) => {
                    tracing::debug!(
                        user_id = %self.context.user_id,
                        action = %action.legacy_payload(),
                        "Button pressed"
                    );
                    Event::ActionSelected(action)
                }
                None => {
                    tracing::debug!(
                        user_id = %self.context.user_id,
                        payload = %payload,
                        "Unknown button payload"
                    );
                    Event::UnknownAction { payload }
                }
            },
        };

        if let Err(e) = self.process_event(event).await {
            tracing::error!(
                user_id = %self.context.user_id,
                state = self.state.name(),
                error = %e,
                "Error handling event"
            );
            // Never leave the user stuck mid-search
            if matches!(self.state, ConvState::SearchingOffers { .. }) {
                self.state = ConvState::AwaitingRoute;
            }
            self.outbox
                .push(OutboundMessage::text(messages(self.context.language).internal_error));
        }

        std::mem::take(&mut self.outbox)
    }

    async fn process_event(&mut self, event: Event) -> Result<(), String> {
        // We need to process events in a loop to handle chained effects
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            // Pure state transition
            let result =
                transition(&self.state, &self.context, current_event).map_err(|e| e.to_string())?;

            if result.new_state != self.state {
                tracing::debug!(
                    user_id = %self.context.user_id,
                    from = self.state.name(),
                    to = result.new_state.name(),
                    "State change"
                );
            }
            self.state = result.new_state;

            // Execute effects and collect generated events
            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        Ok(())
    }

    /// Execute an effect and optionally return a generated event
    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Reply(reply) => {
                let message = self.outbound(reply);
                self.outbox.push(message);
                None
            }

            Effect::StoreLanguage { language } => {
                self.sessions.set_language(&self.context.user_id, language).await;
                self.context.language = language;
                None
            }

            Effect::RecordPurchase {
                agency,
                flight_number,
            } => {
                self.sessions
                    .record_purchase(&self.context.user_id, &agency, &flight_number)
                    .await;
                None
            }

            Effect::ResolveOffers { query } => Some(self.resolve_offers(&query).await),

            Effect::LookupTicket => {
                let ticket = self.sessions.get_ticket(&self.context.user_id).await;
                Some(Event::TicketLoaded { ticket })
            }

            Effect::ExpirePurchaseActions => {
                self.actions.expire_purchases();
                tracing::debug!(
                    user_id = %self.context.user_id,
                    remaining = self.actions.len(),
                    "Expired purchase buttons"
                );
                None
            }
        }
    }

    /// Catalog first; a catalog failure skips the directory fetch.
    async fn resolve_offers(&self, query: &RouteQuery) -> Event {
        let offers = match self.flights.load_offers().await {
            Ok(offers) => offers,
            Err(e) => {
                tracing::warn!(
                    user_id = %self.context.user_id,
                    error = %e,
                    "Flight catalog unavailable"
                );
                return Event::CatalogUnavailable {
                    message: e.to_string(),
                };
            }
        };

        let directory = self.cities.fetch_directory(self.context.language).await;
        let matching = find_offers(offers, query, &directory, self.catalog_filter);
        tracing::info!(
            user_id = %self.context.user_id,
            origin = %query.origin,
            destination = %query.destination,
            date = %query.date,
            offers = matching.len(),
            "Resolved offers"
        );

        Event::OffersResolved {
            offers: present(&matching, &directory),
        }
    }

    /// Swap each button's action for a registry token
    fn outbound(&mut self, reply: Reply) -> OutboundMessage {
        let buttons = reply
            .buttons
            .into_iter()
            .map(|button| OutboundButton {
                label: button.label,
                payload: self.actions.register(button.action),
            })
            .collect();

        OutboundMessage {
            text: reply.text,
            format: reply.format,
            buttons,
        }
    }
}
