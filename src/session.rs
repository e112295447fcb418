//! Per-user session state: chosen language and last purchased ticket

use crate::i18n::Language;
use crate::runtime::SessionStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

/// Opaque user identifier as assigned by the chat transport
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Session record for one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub language: Language,
    /// Summary of the most recent purchase, e.g. `FZ 1 via Agency1`
    pub last_ticket: Option<String>,
}

/// Summary stored for a purchase
pub fn ticket_summary(agency: &str, flight_number: &str) -> String {
    format!("{flight_number} via {agency}")
}

/// Process-lifetime session store behind one lock. Sessions are created on
/// first write and never removed.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<UserId, UserSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one user's session
    #[allow(dead_code)] // Useful for tests
    pub async fn session(&self, user_id: &UserId) -> Option<UserSession> {
        self.sessions.read().await.get(user_id).cloned()
    }

    #[allow(dead_code)] // Useful for tests
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_language(&self, user_id: &UserId) -> Language {
        self.sessions
            .read()
            .await
            .get(user_id)
            .map(|s| s.language)
            .unwrap_or_default()
    }

    async fn set_language(&self, user_id: &UserId, language: Language) {
        self.sessions
            .write()
            .await
            .entry(user_id.clone())
            .or_default()
            .language = language;
        tracing::debug!(%user_id, %language, "Language selected");
    }

    async fn record_purchase(&self, user_id: &UserId, agency: &str, flight_number: &str) {
        let ticket = ticket_summary(agency, flight_number);
        tracing::info!(%user_id, ticket = %ticket, "Recorded purchase");
        self.sessions
            .write()
            .await
            .entry(user_id.clone())
            .or_default()
            .last_ticket = Some(ticket);
    }

    async fn get_ticket(&self, user_id: &UserId) -> Option<String> {
        self.sessions
            .read()
            .await
            .get(user_id)
            .and_then(|s| s.last_ticket.clone())
    }
}
