//! WebSocket frame DTOs.
//!
//! Inbound frames are read into a loose envelope so that a missing or unknown
//! `type` and missing fields can be told apart from malformed JSON.

use serde::{Deserialize, Serialize};

use crate::domain::RiskLevel;

/// Outbound frame type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    History,
    Join,
    Leave,
    Chat,
    CrisisAlert,
    Error,
}

/// Inbound frame as received. Every field is optional; the relay decides
/// which ones a given `type` requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundFrame {
    pub r#type: Option<String>,
    pub room_id: Option<String>,
    pub user_id: Option<String>,
    pub nickname: Option<String>,
    pub content: Option<String>,
}

/// Author display fields attached to a stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDto {
    pub nickname: String,
    pub avatar: Option<String>,
}

/// Persisted chat message as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessageDto {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub content: String,
    pub risk_level: RiskLevel,
    /// RFC 3339 (UTC)
    pub created_at: String,
    pub profile: Option<ProfileDto>,
}

/// Private frame sent after a join: recent messages, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub r#type: MessageType,
    pub messages: Vec<StoredMessageDto>,
}

/// `join` / `leave` presence broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceMessage {
    pub r#type: MessageType,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub nickname: String,
    pub timestamp: String,
}

/// Chat broadcast: the stored record tagged with `type: chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub r#type: MessageType,
    #[serde(flatten)]
    pub message: StoredMessageDto,
}

/// Private support notice for the author of a risky message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisAlertMessage {
    pub r#type: MessageType,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Error,
            message: message.into(),
        }
    }
}

/// Serialize an outbound frame. Failures are logged and yield `None`.
pub fn encode<T: Serialize>(frame: &T) -> Option<String> {
    match serde_json::to_string(frame) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize outbound frame: {}", e);
            None
        }
    }
}
