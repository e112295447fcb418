//! Button actions and their payload tokens
//!
//! Buttons carry a structured [`BotAction`]. The transport only ever sees an
//! opaque token that the per-user [`ActionRegistry`] maps back to the action,
//! so agency names and flight numbers may contain any character.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const LANGUAGE_PREFIX: &str = "lang_";
const PURCHASE_PREFIX: &str = "buy_";

/// What pressing a button means
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotAction {
    SelectLanguage {
        language: Language,
    },
    PurchaseOffer {
        agency: String,
        flight_number: String,
    },
}

impl BotAction {
    pub fn purchase(agency: impl Into<String>, flight_number: impl Into<String>) -> Self {
        BotAction::PurchaseOffer {
            agency: agency.into(),
            flight_number: flight_number.into(),
        }
    }

    /// Delimited form (`lang_ru`, `buy_<agency>_<flight>`) understood by
    /// transports that build payloads themselves
    pub fn legacy_payload(&self) -> String {
        match self {
            BotAction::SelectLanguage { language } => format!("{LANGUAGE_PREFIX}{language}"),
            BotAction::PurchaseOffer {
                agency,
                flight_number,
            } => format!("{PURCHASE_PREFIX}{agency}_{flight_number}"),
        }
    }

    /// Parse the delimited form. The agency ends at the first `_`, so an
    /// agency name containing one cannot round-trip.
    pub fn from_legacy_payload(payload: &str) -> Option<Self> {
        if let Some(code) = payload.strip_prefix(LANGUAGE_PREFIX) {
            return code
                .parse()
                .ok()
                .map(|language| BotAction::SelectLanguage { language });
        }
        let (agency, flight_number) = payload.strip_prefix(PURCHASE_PREFIX)?.split_once('_')?;
        if agency.is_empty() || flight_number.is_empty() {
            return None;
        }
        Some(BotAction::purchase(agency, flight_number))
    }
}

/// Per-user map from button tokens to actions
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, BotAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action` and return the token to put on the button.
    ///
    /// Language buttons never expire, so each language keeps a single token
    /// that every later picker reuses.
    pub fn register(&mut self, action: BotAction) -> String {
        if matches!(action, BotAction::SelectLanguage { .. }) {
            if let Some(token) = self.token_for(&action) {
                return token;
            }
        }
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.actions.insert(token.clone(), action);
        token
    }

    fn token_for(&self, action: &BotAction) -> Option<String> {
        self.actions
            .iter()
            .find(|(_, registered)| *registered == action)
            .map(|(token, _)| token.clone())
    }

    /// Look up a button payload: a registered token first, then the legacy
    /// delimited form.
    pub fn resolve(&self, payload: &str) -> Option<BotAction> {
        self.actions
            .get(payload)
            .cloned()
            .or_else(|| BotAction::from_legacy_payload(payload))
    }

    /// Forget every purchase button handed out so far
    pub fn expire_purchases(&mut self) {
        self.actions
            .retain(|_, action| !matches!(action, BotAction::PurchaseOffer { .. }));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
