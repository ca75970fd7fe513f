use std::sync::Arc;

use tokio::time::timeout;

use aidagent_llm::{prompts, AlertResponder, Turn};
use aidagent_persist::{AlertStore, ChatSessionStore};
use aidagent_types::{AlertRecord, ChatMessage, ChatSession};

use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::flight::FlightMap;

/// The conversational state machine.
///
/// One exchange runs append(participant) → summarize into a bounded context
/// window → responder call → append(assistant), serialized per session key
/// so message order within a session is exactly send/receive order.
pub struct ChatSessionManager {
    alerts: Arc<dyn AlertStore>,
    sessions: Arc<dyn ChatSessionStore>,
    responder: Arc<dyn AlertResponder>,
    config: ChatConfig,
    locks: FlightMap,
}

impl ChatSessionManager {
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        sessions: Arc<dyn ChatSessionStore>,
        responder: Arc<dyn AlertResponder>,
        config: ChatConfig,
    ) -> Self {
        Self {
            alerts,
            sessions,
            responder,
            config,
            locks: FlightMap::new(),
        }
    }

    pub async fn converse(
        &self,
        alert_id: &str,
        participant_id: &str,
        text: &str,
    ) -> Result<String, ChatError> {
        let key = ChatSession::key(alert_id, participant_id);
        let flight = self.locks.entry(&key);
        let _gate = flight.acquire().await;

        let alert = self
            .alerts
            .find_alert(alert_id)
            .await?
            .ok_or_else(|| ChatError::AlertNotFound(alert_id.to_string()))?;

        if self
            .sessions
            .find_session(alert_id, participant_id)
            .await?
            .is_none()
        {
            self.sessions
                .create_session(alert_id, participant_id)
                .await?;
        }

        // The participant's turn is committed before the responder is
        // consulted; a failed call still leaves it in the history.
        let session = self
            .sessions
            .append_message(alert_id, participant_id, ChatMessage::participant(text))
            .await?;

        let turns = self.build_context(&alert, &session.messages);
        let reply = self.ask_responder(&turns).await?;

        self.sessions
            .append_message(alert_id, participant_id, ChatMessage::assistant(reply.clone()))
            .await?;

        Ok(reply)
    }

    pub async fn get_history(
        &self,
        alert_id: &str,
        participant_id: &str,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        self.sessions
            .find_session(alert_id, participant_id)
            .await?
            .map(|session| session.messages)
            .ok_or_else(|| ChatError::SessionNotFound {
                alert_id: alert_id.to_string(),
                participant_id: participant_id.to_string(),
            })
    }

    /// System preamble plus the most recent turns. Bounds only what is sent
    /// to the responder, never what is stored.
    fn build_context(&self, alert: &AlertRecord, messages: &[ChatMessage]) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.config.context_window + 1);
        turns.push(Turn::system(prompts::chat_preamble(alert)));

        let start = messages.len().saturating_sub(self.config.context_window);
        turns.extend(messages[start..].iter().map(Turn::from));
        turns
    }

    async fn ask_responder(&self, turns: &[Turn]) -> Result<String, ChatError> {
        match timeout(self.config.responder_timeout, self.responder.respond(turns)).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(ChatError::ResponderUnavailable(e.to_string())),
            Err(_) => Err(ChatError::ResponderUnavailable(format!(
                "timed out after {:?}",
                self.config.responder_timeout
            ))),
        }
    }
}
