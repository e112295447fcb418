//! Conversation state types

use crate::config::PurchaseLinkConfig;
use crate::i18n::Language;
use crate::presenter::DisplayOffer;
use crate::route::RouteQuery;
use crate::session::UserId;
use serde::{Deserialize, Serialize};

/// Flight and agencies from the most recent result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServedOffer {
    pub flight_number: String,
    pub agencies: Vec<String>,
}

impl From<&DisplayOffer> for ServedOffer {
    fn from(offer: &DisplayOffer) -> Self {
        Self {
            flight_number: offer.flight_number.clone(),
            agencies: offer.agencies().map(str::to_string).collect(),
        }
    }
}

/// Conversation state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Language picker shown, nothing chosen yet
    #[default]
    AwaitingLanguage,

    /// Waiting for a `City - City DD.MM.YYYY` message
    AwaitingRoute,

    /// Route accepted, catalog and directory lookups in flight
    SearchingOffers { query: RouteQuery },

    /// Offers shown, waiting for the user to pick an agency
    AwaitingSelection { served: Vec<ServedOffer> },
}

impl ConvState {
    /// Short name for logs and the API
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::AwaitingLanguage => "awaiting_language",
            ConvState::AwaitingRoute => "awaiting_route",
            ConvState::SearchingOffers { .. } => "searching_offers",
            ConvState::AwaitingSelection { .. } => "awaiting_selection",
        }
    }

    /// Whether `(agency, flight_number)` was offered in the current result list
    pub fn serves(&self, agency: &str, flight_number: &str) -> bool {
        match self {
            ConvState::AwaitingSelection { served } => served.iter().any(|offer| {
                offer.flight_number == flight_number && offer.agencies.iter().any(|a| a == agency)
            }),
            _ => false,
        }
    }
}

/// Per-user context handed to every transition
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub user_id: UserId,
    /// Language from the session store, refreshed before each event
    pub language: Language,
    pub purchase: PurchaseLinkConfig,
}

impl ConvContext {
    pub fn new(user_id: UserId, purchase: PurchaseLinkConfig) -> Self {
        Self {
            user_id,
            language: Language::default(),
            purchase,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}
