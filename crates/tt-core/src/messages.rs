//! Popup message protocol
//!
//! Push: after each increment the background broadcasts
//! `{"action":"UPDATE_STATUS","data":{"count":N,"tabId":T}}`.
//! Pull: the popup sends `{"action":"GET_COUNT"}`, optionally with a
//! `tabId`, and gets `{"count":N,"tabId":T}` back. The popup may also
//! acknowledge a broadcast with `{"status":"received"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::TabId;

/// Error type for messages that cannot be understood.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Message has neither an action nor a status")]
    MissingAction,
}

// =============================================================================
// Inbound
// =============================================================================

/// Message received from a display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Ask for the count of a tab. Without an explicit id the sender's tab,
    /// then the active tab, is used.
    GetCount { tab_id: Option<TabId> },
    /// Popup confirmation of a broadcast.
    Ack { status: String },
}

#[derive(Deserialize)]
#[serde(tag = "action")]
enum ActionMessage {
    #[serde(rename = "GET_COUNT")]
    GetCount {
        #[serde(default, rename = "tabId")]
        tab_id: Option<TabId>,
    },
}

impl InboundMessage {
    pub fn from_json(text: &str) -> Result<Self, MessageError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self, MessageError> {
        if value.get("action").is_some() {
            return match serde_json::from_value::<ActionMessage>(value)? {
                ActionMessage::GetCount { tab_id } => Ok(Self::GetCount { tab_id }),
            };
        }
        match value.get("status").and_then(Value::as_str) {
            Some(status) => Ok(Self::Ack {
                status: status.to_string(),
            }),
            None => Err(MessageError::MissingAction),
        }
    }
}

// =============================================================================
// Outbound
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    pub count: u32,
    pub tab_id: TabId,
}

/// Broadcast from the background to any listening view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action")]
pub enum OutboundMessage {
    #[serde(rename = "UPDATE_STATUS")]
    UpdateStatus { data: StatusData },
}

impl OutboundMessage {
    pub fn update_status(tab_id: TabId, count: u32) -> Self {
        Self::UpdateStatus {
            data: StatusData { count, tab_id },
        }
    }

    pub fn to_value(&self) -> Result<Value, MessageError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Reply to a count query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountReply {
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
}

impl CountReply {
    pub fn to_value(&self) -> Result<Value, MessageError> {
        Ok(serde_json::to_value(self)?)
    }
}
