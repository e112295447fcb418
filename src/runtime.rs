//! Per-user conversation runtimes
//!
//! Each user gets one actor task that owns their conversation state and
//! button registry. Requests for a user are handled strictly in order;
//! different users never wait on each other.

mod executor;
pub mod traits;


pub use executor::UserRuntime;
pub use traits::*;

use crate::catalog::CatalogFilter;
use crate::config::PurchaseLinkConfig;
use crate::session::UserId;
use crate::state_machine::{ConvContext, ConvState, Event, TextFormat};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Type alias for the runtime the server spawns
pub type ProductionRuntime =
    UserRuntime<Arc<dyn CitySource>, Arc<dyn FlightSource>, Arc<dyn SessionStore>>;

/// Something the transport delivered for a user
#[derive(Debug, Clone)]
pub enum Inbound {
    /// A command or free text, already mapped to an event
    Event(Event),
    /// A button press carrying its payload
    Callback { payload: String },
}

impl From<Event> for Inbound {
    fn from(event: Event) -> Self {
        Inbound::Event(event)
    }
}

/// A queued inbound item plus the channel its replies go back on
#[derive(Debug)]
pub struct Request {
    pub inbound: Inbound,
    pub reply_tx: oneshot::Sender<Vec<OutboundMessage>>,
}

/// Button as the transport sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundButton {
    pub label: String,
    pub payload: String,
}

/// Message as the transport sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub text: String,
    pub format: Option<TextFormat>,
    pub buttons: Vec<OutboundButton>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
            buttons: vec![],
        }
    }
}

/// Settings shared by every user runtime
#[derive(Debug, Clone, Default)]
pub struct RuntimeSettings {
    pub catalog_filter: CatalogFilter,
    pub purchase: PurchaseLinkConfig,
}

/// Handle to interact with a running user runtime
#[derive(Clone)]
pub struct UserHandle {
    pub request_tx: mpsc::Sender<Request>,
}

/// Manager for all user runtimes
pub struct RuntimeManager {
    cities: Arc<dyn CitySource>,
    flights: Arc<dyn FlightSource>,
    sessions: Arc<dyn SessionStore>,
    settings: RuntimeSettings,
    runtimes: RwLock<HashMap<UserId, UserHandle>>,
}

impl RuntimeManager {
    pub fn new(
        cities: Arc<dyn CitySource>,
        flights: Arc<dyn FlightSource>,
        sessions: Arc<dyn SessionStore>,
        settings: RuntimeSettings,
    ) -> Self {
        Self {
            cities,
            flights,
            sessions,
            settings,
            runtimes: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the runtime for a user
    pub async fn get_or_create(&self, user_id: &UserId) -> UserHandle {
        if let Some(handle) = self.runtimes.read().await.get(user_id) {
            return handle.clone();
        }

        let mut runtimes = self.runtimes.write().await;
        // Another request may have started it while we waited for the lock
        if let Some(handle) = runtimes.get(user_id) {
            return handle.clone();
        }

        let (request_tx, request_rx) = mpsc::channel(32);
        let context = ConvContext::new(user_id.clone(), self.settings.purchase.clone());
        let runtime: ProductionRuntime = UserRuntime::new(
            context,
            ConvState::default(),
            Arc::clone(&self.cities),
            Arc::clone(&self.flights),
            Arc::clone(&self.sessions),
            self.settings.catalog_filter,
            request_rx,
        );

        let id = user_id.clone();
        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(user_id = %id, "User runtime finished");
        });
        tracing::debug!(user_id = %user_id, "Started user runtime");

        let handle = UserHandle { request_tx };
        runtimes.insert(user_id.clone(), handle.clone());
        handle
    }

    /// Deliver one inbound item and wait for the replies it produced
    pub async fn dispatch(
        &self,
        user_id: &UserId,
        inbound: impl Into<Inbound>,
    ) -> Result<Vec<OutboundMessage>, String> {
        let handle = self.get_or_create(user_id).await;
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = Request {
            inbound: inbound.into(),
            reply_tx,
        };

        if let Err(e) = handle.request_tx.send(request).await {
            self.evict(user_id, &handle).await;
            return Err(format!("Failed to send request: {e}"));
        }
        match reply_rx.await {
            Ok(replies) => Ok(replies),
            Err(e) => {
                self.evict(user_id, &handle).await;
                Err(format!("User runtime dropped the request: {e}"))
            }
        }
    }

    /// Forget a dead actor so the next request starts a fresh one. A
    /// replacement registered in the meantime is left alone.
    async fn evict(&self, user_id: &UserId, handle: &UserHandle) {
        let mut runtimes = self.runtimes.write().await;
        if runtimes
            .get(user_id)
            .is_some_and(|current| current.request_tx.same_channel(&handle.request_tx))
        {
            runtimes.remove(user_id);
            tracing::warn!(user_id = %user_id, "Evicted dead user runtime");
        }
    }

    /// Number of users with a live runtime
    #[allow(dead_code)] // Useful for tests
    pub async fn active_users(&self) -> usize {
        self.runtimes.read().await.len()
    }
}
