//! Transient user-facing notices.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message identity. Random, so two messages with equal text stay distinct.
pub type MessageId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Success,
    Warn,
    Error,
}

/// One notice shown by the message banner until it expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl Message {
    /// Creates a message with a freshly generated id.
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            kind,
        }
    }
}
