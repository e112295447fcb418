//! Events that can occur in a conversation

use crate::actions::BotAction;
use crate::presenter::DisplayOffer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    Start,
    Help,
    MyTicket,
    Text {
        text: String,
    },
    ActionSelected(BotAction),
    /// Button payload that maps to no known action
    UnknownAction {
        payload: String,
    },

    // Effect results
    OffersResolved {
        offers: Vec<DisplayOffer>,
    },
    CatalogUnavailable {
        message: String,
    },
    TicketLoaded {
        ticket: Option<String>,
    },
}

/// Slash commands the transport can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Start,
    MyTicket,
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command: /{0}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('/') {
            "start" => Ok(Command::Start),
            "myticket" => Ok(Command::MyTicket),
            "help" => Ok(Command::Help),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl From<Command> for Event {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => Event::Start,
            Command::MyTicket => Event::MyTicket,
            Command::Help => Event::Help,
        }
    }
}
