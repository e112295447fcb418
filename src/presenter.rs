//! Turns catalog offers into display-ready entries with purchase actions

use crate::actions::BotAction;
use crate::catalog::FlightOffer;
use crate::directory::CityDirectory;
use crate::i18n::{messages, Language};
use serde::{Deserialize, Serialize};

/// One offer as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOffer {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub airline: String,
    pub aircraft: String,
    pub stopovers: String,
    pub price: String,
    /// One purchase action per agency, in catalog order
    pub actions: Vec<PurchaseAction>,
}

/// A purchase button: agency label plus the action it triggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseAction {
    pub label: String,
    pub action: BotAction,
}

impl DisplayOffer {
    /// Agencies offering this flight, in button order
    pub fn agencies(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.label.as_str())
    }

    pub fn render(&self, language: Language) -> String {
        format!(
            "🛫 {} → {}\n✈ {}\n🛩 {} ({})\n📍 {}\n💲 {}\n{}",
            self.origin,
            self.destination,
            self.airline,
            self.flight_number,
            self.aircraft,
            self.stopovers,
            self.price,
            messages(language).available_via,
        )
    }
}

/// Resolve city codes and build purchase actions, preserving offer order and
/// each offer's agency order. Unknown codes are shown as-is.
pub fn present(offers: &[FlightOffer], directory: &CityDirectory) -> Vec<DisplayOffer> {
    offers
        .iter()
        .map(|offer| DisplayOffer {
            flight_number: offer.flight_number.clone(),
            origin: directory.display_name(&offer.origin).to_string(),
            destination: directory.display_name(&offer.destination).to_string(),
            airline: offer.airline.clone(),
            aircraft: offer.aircraft.clone(),
            stopovers: offer.stopovers.clone(),
            price: offer.price.to_string(),
            actions: offer
                .agencies
                .iter()
                .map(|agency| PurchaseAction {
                    label: agency.name.clone(),
                    action: BotAction::purchase(&agency.name, &offer.flight_number),
                })
                .collect(),
        })
        .collect()
}
