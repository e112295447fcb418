//! Effects produced by state transitions

use crate::actions::BotAction;
use crate::i18n::Language;
use crate::route::RouteQuery;
use serde::Serialize;

/// How the transport should interpret reply text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Markdown,
}

/// A button attached to a reply, before it gets a payload token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyButton {
    pub label: String,
    pub action: BotAction,
}

/// An outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: Option<TextFormat>,
    pub buttons: Vec<ReplyButton>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
            buttons: vec![],
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            format: Some(TextFormat::Markdown),
            ..Self::text(text)
        }
    }

    pub fn with_button(mut self, label: impl Into<String>, action: BotAction) -> Self {
        self.buttons.push(ReplyButton {
            label: label.into(),
            action,
        });
        self
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message to the user
    Reply(Reply),

    /// Remember the user's language
    StoreLanguage { language: Language },

    /// Overwrite the user's last ticket
    RecordPurchase {
        agency: String,
        flight_number: String,
    },

    /// Load the catalog and city names, then emit `OffersResolved` or
    /// `CatalogUnavailable`
    ResolveOffers { query: RouteQuery },

    /// Read the last ticket, then emit `TicketLoaded`
    LookupTicket,

    /// Invalidate purchase buttons from earlier searches
    ExpirePurchaseActions,
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(Reply::text(text))
    }

    pub fn reply_markdown(text: impl Into<String>) -> Self {
        Effect::Reply(Reply::markdown(text))
    }
}
