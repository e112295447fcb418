//! API request and response types

use crate::i18n::CommandInfo;
use crate::runtime::OutboundMessage;
use serde::{Deserialize, Serialize};

/// Free text typed by the user
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// A button press
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub payload: String,
}

/// Replies to deliver, in order
#[derive(Debug, Serialize)]
pub struct RepliesResponse {
    pub replies: Vec<OutboundMessage>,
}

/// Bot command menu
#[derive(Debug, Serialize)]
pub struct CommandsResponse {
    pub commands: Vec<CommandInfo>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
