//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::catalog::{CatalogError, FlightOffer};
use crate::directory::CityDirectory;
use crate::i18n::Language;
use crate::session::UserId;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of IATA city code to display name mappings
#[async_trait]
pub trait CitySource: Send + Sync {
    /// Names in `language`. Failures yield an empty directory so callers
    /// fall back to raw codes.
    async fn fetch_directory(&self, language: Language) -> CityDirectory;
}

/// Source of flight offers
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// Load every offer, in catalog order
    async fn load_offers(&self) -> Result<Vec<FlightOffer>, CatalogError>;
}

/// Per-user language and last ticket
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Chosen language, English when none was chosen
    async fn get_language(&self, user_id: &UserId) -> Language;

    async fn set_language(&self, user_id: &UserId, language: Language);

    /// Overwrite the user's last ticket
    async fn record_purchase(&self, user_id: &UserId, agency: &str, flight_number: &str);

    async fn get_ticket(&self, user_id: &UserId) -> Option<String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: CitySource + ?Sized> CitySource for Arc<T> {
    async fn fetch_directory(&self, language: Language) -> CityDirectory {
        (**self).fetch_directory(language).await
    }
}

#[async_trait]
impl<T: FlightSource + ?Sized> FlightSource for Arc<T> {
    async fn load_offers(&self) -> Result<Vec<FlightOffer>, CatalogError> {
        (**self).load_offers().await
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get_language(&self, user_id: &UserId) -> Language {
        (**self).get_language(user_id).await
    }

    async fn set_language(&self, user_id: &UserId, language: Language) {
        (**self).set_language(user_id, language).await;
    }

    async fn record_purchase(&self, user_id: &UserId, agency: &str, flight_number: &str) {
        (**self).record_purchase(user_id, agency, flight_number).await;
    }

    async fn get_ticket(&self, user_id: &UserId) -> Option<String> {
        (**self).get_ticket(user_id).await
    }
}
