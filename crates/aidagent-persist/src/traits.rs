use async_trait::async_trait;
use chrono::{DateTime, Utc};

use aidagent_types::{AlertFieldUpdate, AlertRecord, ChatMessage, ChatSession, FreshnessMetadata};

use crate::error::Result;

/// Persistence operations for alert records and the freshness-metadata
/// singleton.
///
/// Implementations must make `replace_all` atomic with respect to
/// `list_current`: a concurrent reader sees either the full prior dataset or
/// the full new one, never a mix.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// All records of the current dataset version, newest first.
    async fn list_current(&self) -> Result<Vec<AlertRecord>>;

    async fn find_alert(&self, alert_id: &str) -> Result<Option<AlertRecord>>;

    /// Insert an explicitly created record into the current dataset.
    async fn insert_alert(&self, alert: AlertRecord) -> Result<AlertRecord>;

    /// PUT-style partial update. Never touches the freshness stamp or the
    /// dataset version. Returns `None` when the record does not exist.
    async fn update_alert(
        &self,
        alert_id: &str,
        update: AlertFieldUpdate,
    ) -> Result<Option<AlertRecord>>;

    /// Returns whether a record was deleted.
    async fn delete_alert(&self, alert_id: &str) -> Result<bool>;

    /// Atomically replace the whole dataset and advance `last_refreshed`.
    async fn replace_all(
        &self,
        records: Vec<AlertRecord>,
        refreshed_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Persist a single re-queried record after a per-alert refresh,
    /// overwriting its refreshable fields and freshness stamp.
    async fn save_refreshed(&self, alert: &AlertRecord) -> Result<()>;

    /// The freshness-metadata singleton, if any refresh has ever committed.
    async fn freshness(&self) -> Result<Option<FreshnessMetadata>>;
}

/// Persistence operations for per-(alert, participant) conversations.
#[async_trait]
pub trait ChatSessionStore: Send + Sync {
    async fn find_session(
        &self,
        alert_id: &str,
        participant_id: &str,
    ) -> Result<Option<ChatSession>>;

    /// Create an empty session for the key. Keys are unique; callers are
    /// expected to have checked for an existing session first.
    async fn create_session(&self, alert_id: &str, participant_id: &str) -> Result<ChatSession>;

    /// Append one message and bump `updated_at`, returning the new session
    /// snapshot. Appends are the only way messages enter a session.
    async fn append_message(
        &self,
        alert_id: &str,
        participant_id: &str,
        message: ChatMessage,
    ) -> Result<ChatSession>;
}
