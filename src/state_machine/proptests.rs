//! Property-based tests for the state machine and its pure helpers
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::actions::BotAction;
use crate::catalog::{Agency, FlightOffer, Price};
use crate::config::PurchaseLinkConfig;
use crate::directory::CityDirectory;
use crate::i18n::Language;
use crate::presenter::present;
use crate::route::{self, RouteError};
use crate::session::UserId;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(language: Language) -> ConvContext {
    ConvContext::new(UserId::from("prop-user"), PurchaseLinkConfig::default())
        .with_language(language)
}

fn has_lookup_effect(result: &TransitionResult) -> bool {
    result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::ResolveOffers { .. }))
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_city() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z]{4,12}",
        "[А-Яа-яЁё]{4,12}",
        "[A-Za-z]{2,6}-[A-Za-z]{2,6}",
        "[A-Za-z]{3,6} [A-Za-z]{3,6}",
    ]
}

fn arb_short_city() -> impl Strategy<Value = String> {
    "[A-Za-zА-Яа-я]{1,3}"
}

fn arb_date() -> impl Strategy<Value = String> {
    ("[0-9]{2}", "[0-9]{2}", "[0-9]{4}").prop_map(|(d, m, y)| format!("{d}.{m}.{y}"))
}

fn arb_bad_date() -> impl Strategy<Value = String> {
    prop_oneof![
        ("[0-9]{1}", "[0-9]{2}", "[0-9]{4}").prop_map(|(d, m, y)| format!("{d}.{m}.{y}")),
        ("[0-9]{2}", "[0-9]{3}", "[0-9]{4}").prop_map(|(d, m, y)| format!("{d}.{m}.{y}")),
        ("[0-9]{2}", "[0-9]{2}", "[0-9]{2}").prop_map(|(d, m, y)| format!("{d}.{m}.{y}")),
        ("[0-9]{2}", "[0-9]{2}", "[0-9]{4}").prop_map(|(d, m, y)| format!("{d}/{m}/{y}")),
    ]
}

fn arb_language() -> impl Strategy<Value = Language> {
    prop_oneof![Just(Language::En), Just(Language::Ru)]
}

fn arb_offer() -> impl Strategy<Value = FlightOffer> {
    (
        "[A-Z]{2} [0-9]{1,4}",
        "[A-Z]{3}",
        "[A-Z]{3}",
        proptest::collection::vec("[A-Za-z]{3,10}", 0..4),
    )
        .prop_map(|(flight_number, origin, destination, agencies)| FlightOffer {
            flight_number,
            airline: "Airline".to_string(),
            aircraft: "Aircraft".to_string(),
            origin,
            destination,
            stopovers: "Direct".to_string(),
            price: Price::Text("100".to_string()),
            agencies: agencies.into_iter().map(|name| Agency { name }).collect(),
            date: None,
        })
}

fn arb_served_state() -> impl Strategy<Value = ConvState> {
    proptest::collection::vec(arb_offer(), 1..5).prop_map(|offers| ConvState::AwaitingSelection {
        served: present(&offers, &CityDirectory::empty())
            .iter()
            .map(ServedOffer::from)
            .collect(),
    })
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::AwaitingLanguage),
        Just(ConvState::AwaitingRoute),
        arb_served_state(),
    ]
}

// ============================================================================
// Route grammar
// ============================================================================

proptest! {
    #[test]
    fn prop_well_formed_routes_parse(
        origin in arb_city(),
        destination in arb_city(),
        date in arb_date()
    ) {
        let text = format!("{origin} - {destination} {date}");
        let query = route::parse(&text).unwrap();
        prop_assert_eq!(query.date.to_string(), date);
        prop_assert!(!query.origin.is_empty());
        prop_assert!(!query.destination.is_empty());
    }

    #[test]
    fn prop_short_origin_rejected(
        origin in arb_short_city(),
        destination in arb_city(),
        date in arb_date()
    ) {
        let text = format!("{origin} - {destination} {date}");
        prop_assert_eq!(route::parse(&text), Err(RouteError::InvalidFormat));
    }

    #[test]
    fn prop_short_destination_rejected(
        origin in arb_city(),
        destination in arb_short_city(),
        date in arb_date()
    ) {
        let text = format!("{origin} - {destination} {date}");
        prop_assert_eq!(route::parse(&text), Err(RouteError::InvalidFormat));
    }

    #[test]
    fn prop_missing_dash_rejected(
        origin in "[A-Za-z]{4,12}",
        destination in "[A-Za-z]{4,12}",
        date in arb_date()
    ) {
        let text = format!("{origin} {destination} {date}");
        prop_assert_eq!(route::parse(&text), Err(RouteError::InvalidFormat));
    }

    #[test]
    fn prop_bad_date_rejected(
        origin in arb_city(),
        destination in arb_city(),
        date in arb_bad_date()
    ) {
        let text = format!("{origin} - {destination} {date}");
        prop_assert_eq!(route::parse(&text), Err(RouteError::InvalidFormat));
    }

    #[test]
    fn prop_trailing_token_rejected(
        origin in arb_city(),
        destination in arb_city(),
        date in arb_date(),
        extra in "[a-z0-9]{1,5}"
    ) {
        let text = format!("{origin} - {destination} {date} {extra}");
        prop_assert_eq!(route::parse(&text), Err(RouteError::InvalidFormat));
    }
}

// ============================================================================
// Presenter
// ============================================================================

proptest! {
    #[test]
    fn prop_present_preserves_order(offers in proptest::collection::vec(arb_offer(), 0..8)) {
        let shown = present(&offers, &CityDirectory::empty());

        prop_assert_eq!(shown.len(), offers.len());
        for (offer, display) in offers.iter().zip(&shown) {
            prop_assert_eq!(&display.flight_number, &offer.flight_number);
            // Empty directory: raw codes everywhere
            prop_assert_eq!(&display.origin, &offer.origin);
            prop_assert_eq!(&display.destination, &offer.destination);
            let agencies: Vec<&str> = offer.agencies.iter().map(|a| a.name.as_str()).collect();
            prop_assert_eq!(display.agencies().collect::<Vec<_>>(), agencies);
        }
    }
}

// ============================================================================
// Transition invariants
// ============================================================================

proptest! {
    #[test]
    fn prop_help_and_ticket_never_change_state(state in arb_state(), language in arb_language()) {
        for event in [Event::Help, Event::MyTicket, Event::TicketLoaded { ticket: None }] {
            let result = transition(&state, &test_context(language), event).unwrap();
            prop_assert_eq!(&result.new_state, &state);
        }
    }

    #[test]
    fn prop_invalid_text_never_searches(state in arb_state(), text in "[a-z0-9 .]{0,30}") {
        let result = transition(&state, &test_context(Language::En), Event::Text { text }).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(!has_lookup_effect(&result));
    }

    #[test]
    fn prop_unserved_purchase_never_records(
        state in arb_state(),
        agency in "[a-z]{1,8}",
        flight in "[0-9]{5}"
    ) {
        // Five-digit flight numbers never collide with generated offers
        let event = Event::ActionSelected(BotAction::purchase(agency, flight));
        let result = transition(&state, &test_context(Language::En), event).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        let recorded = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::RecordPurchase { .. }));
        prop_assert!(!recorded);
    }

    #[test]
    fn prop_served_purchase_records_once(state in arb_served_state()) {
        let ConvState::AwaitingSelection { served } = &state else { unreachable!() };
        for offer in served {
            for agency in &offer.agencies {
                let action = BotAction::purchase(agency, &offer.flight_number);
                let event = Event::ActionSelected(action);
                let result = transition(&state, &test_context(Language::En), event).unwrap();
                prop_assert_eq!(&result.new_state, &ConvState::AwaitingRoute);
                let records = result
                    .effects
                    .iter()
                    .filter(|e| matches!(e, Effect::RecordPurchase { .. }))
                    .count();
                prop_assert_eq!(records, 1);
            }
        }
    }

    #[test]
    fn prop_start_always_resets(state in arb_state(), language in arb_language()) {
        let result = transition(&state, &test_context(language), Event::Start).unwrap();
        prop_assert_eq!(result.new_state, ConvState::AwaitingLanguage);
        prop_assert_eq!(result.effects.len(), 1);
    }
}
