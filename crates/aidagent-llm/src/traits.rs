use async_trait::async_trait;

use aidagent_types::{ChatMessage, ChatRole, RawAlert};

use crate::error::{ProviderError, ResponderError};

/// External generative data source for alert batches.
///
/// `fetch_alerts` takes a location scope and returns raw, unvalidated
/// records. Ordering of the returned batch carries no meaning; callers that
/// care about recency sort after ingestion.
#[async_trait]
pub trait AlertProvider: Send + Sync {
    async fn fetch_alerts(&self, scope: &str) -> Result<Vec<RawAlert>, ProviderError>;
}

/// External generative responder for alert conversations.
///
/// Takes an ordered list of turns (system preamble first, then the bounded
/// recent history) and returns one free-text reply.
#[async_trait]
pub trait AlertResponder: Send + Sync {
    async fn respond(&self, turns: &[Turn]) -> Result<String, ResponderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    System,
    Participant,
    Assistant,
}

/// One turn of the context window sent to the responder.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            text: text.into(),
        }
    }

    pub fn participant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Participant,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

impl From<&ChatMessage> for Turn {
    fn from(msg: &ChatMessage) -> Self {
        match msg.role {
            ChatRole::Participant => Turn::participant(&msg.text),
            ChatRole::Assistant => Turn::assistant(&msg.text),
        }
    }
}
