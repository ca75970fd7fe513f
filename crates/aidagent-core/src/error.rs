use thiserror::Error;

use aidagent_persist::StoreError;

/// Failures of the alert read/refresh path.
///
/// Provider failures never appear here: the orchestrator absorbs them and
/// serves the dataset it already has. Only missing entities and store
/// failures reach the caller.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the conversational path.
///
/// Unlike alert reads there is no cached reply to fall back to, so
/// responder failures are surfaced directly.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("Chat session not found for alert {alert_id} and participant {participant_id}")]
    SessionNotFound {
        alert_id: String,
        participant_id: String,
    },

    #[error("Responder unavailable: {0}")]
    ResponderUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
