use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Participant,
    Assistant,
}

/// One turn of a persisted conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn participant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Participant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Conversation document keyed by `(alert_id, participant_id)`.
///
/// Messages are append-only; insertion order is chronological order.
/// Created lazily on the first message for a key and never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub alert_id: String,
    pub participant_id: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(alert_id: impl Into<String>, participant_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            alert_id: alert_id.into(),
            participant_id: participant_id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Composite key used for per-session serialization.
    pub fn key(alert_id: &str, participant_id: &str) -> String {
        format!("{alert_id}:{participant_id}")
    }
}
