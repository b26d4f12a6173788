//! API request and response types

use crate::runtime::ChatSnapshot;
use serde::{Deserialize, Serialize};

/// Request to click one of the offered buttons
#[derive(Debug, Deserialize)]
pub struct OptionRequest {
    pub label: String,
}

/// Request to submit the visitor's name
#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub text: String,
}

/// Response for a newly opened chat
#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    pub session_id: String,
}

/// Response with the current chat view
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub chat: ChatSnapshot,
}

/// Response for an accepted visitor action
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
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
