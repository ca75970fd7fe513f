#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use aidagent_llm::{AlertProvider, AlertResponder, ProviderError, ResponderError, Turn};
use aidagent_persist::{AlertStore, ChatSessionStore, StoreError};
use aidagent_types::{
    AlertFieldUpdate, AlertRecord, ChatMessage, ChatSession, FreshnessMetadata, FreshnessStamp,
    RawAlert,
};

// ---------------------------------------------------------------------------
// In-memory alert store
// ---------------------------------------------------------------------------

struct AlertState {
    alerts: Vec<AlertRecord>,
    meta: Option<FreshnessMetadata>,
}

pub struct InMemoryAlertStore {
    state: Mutex<AlertState>,
    pub fail_replace: AtomicBool,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AlertState {
                alerts: Vec::new(),
                meta: None,
            }),
            fail_replace: AtomicBool::new(false),
        }
    }

    /// Store pre-populated with a dataset last refreshed at `last_refreshed`
    /// (or never, when `None`).
    pub fn seeded(alerts: Vec<AlertRecord>, last_refreshed: Option<DateTime<Utc>>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().unwrap();
            state.alerts = alerts;
            state.meta = last_refreshed.map(|at| FreshnessMetadata {
                id: FreshnessMetadata::SINGLETON_ID.to_string(),
                current_version: "seed".to_string(),
                last_refreshed: Some(at),
            });
        }
        store
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state
            .lock()
            .unwrap()
            .meta
            .as_ref()
            .and_then(|m| m.last_refreshed)
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn list_current(&self) -> Result<Vec<AlertRecord>, StoreError> {
        Ok(self.state.lock().unwrap().alerts.clone())
    }

    async fn find_alert(&self, alert_id: &str) -> Result<Option<AlertRecord>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .alerts
            .iter()
            .find(|a| a.alert_id == alert_id)
            .cloned())
    }

    async fn insert_alert(&self, alert: AlertRecord) -> Result<AlertRecord, StoreError> {
        self.state.lock().unwrap().alerts.push(alert.clone());
        Ok(alert)
    }

    async fn update_alert(
        &self,
        alert_id: &str,
        update: AlertFieldUpdate,
    ) -> Result<Option<AlertRecord>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(alert) = state.alerts.iter_mut().find(|a| a.alert_id == alert_id) else {
            return Ok(None);
        };
        if let Some(message) = update.message {
            alert.message = message;
        }
        if let Some(location) = update.location {
            alert.location = Some(location);
        }
        if let Some(related) = update.related_request_id {
            alert.related_request_id = Some(related);
        }
        if let Some(missing) = update.missing_persons_reported {
            alert.missing_persons_reported = Some(missing);
        }
        if let Some(source) = update.source {
            alert.source = source;
        }
        if let Some(details) = update.details {
            alert.details = details;
        }
        if let Some(aid) = update.aid_available {
            alert.aid_available = aid;
        }
        Ok(Some(alert.clone()))
    }

    async fn delete_alert(&self, alert_id: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.alerts.len();
        state.alerts.retain(|a| a.alert_id != alert_id);
        Ok(state.alerts.len() < before)
    }

    async fn replace_all(
        &self,
        records: Vec<AlertRecord>,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(StoreError::Internal("replace failed".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.alerts = records;
        state.meta = Some(FreshnessMetadata {
            id: FreshnessMetadata::SINGLETON_ID.to_string(),
            current_version: uuid_like(refreshed_at),
            last_refreshed: Some(refreshed_at),
        });
        Ok(())
    }

    async fn save_refreshed(&self, alert: &AlertRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(stored) = state
            .alerts
            .iter_mut()
            .find(|a| a.alert_id == alert.alert_id)
        {
            stored.message = alert.message.clone();
            stored.location = alert.location.clone();
            stored.timestamp = alert.timestamp;
            stored.freshness = alert.freshness;
        }
        Ok(())
    }

    async fn freshness(&self) -> Result<Option<FreshnessMetadata>, StoreError> {
        Ok(self.state.lock().unwrap().meta.clone())
    }
}

fn uuid_like(at: DateTime<Utc>) -> String {
    format!("v-{}", at.timestamp_millis())
}

// ---------------------------------------------------------------------------
// In-memory chat session store
// ---------------------------------------------------------------------------

pub struct InMemoryChatStore {
    sessions: Mutex<HashMap<String, ChatSession>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ChatSessionStore for InMemoryChatStore {
    async fn find_session(
        &self,
        alert_id: &str,
        participant_id: &str,
    ) -> Result<Option<ChatSession>, StoreError> {
        let key = ChatSession::key(alert_id, participant_id);
        Ok(self.sessions.lock().unwrap().get(&key).cloned())
    }

    async fn create_session(
        &self,
        alert_id: &str,
        participant_id: &str,
    ) -> Result<ChatSession, StoreError> {
        let key = ChatSession::key(alert_id, participant_id);
        let session = ChatSession::new(alert_id, participant_id);
        self.sessions.lock().unwrap().insert(key, session.clone());
        Ok(session)
    }

    async fn append_message(
        &self,
        alert_id: &str,
        participant_id: &str,
        message: ChatMessage,
    ) -> Result<ChatSession, StoreError> {
        let key = ChatSession::key(alert_id, participant_id);
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(&key)
            .ok_or_else(|| StoreError::SessionNotFound(key.clone()))?;
        session.messages.push(message);
        session.updated_at = Utc::now();
        Ok(session.clone())
    }
}

// ---------------------------------------------------------------------------
// Scripted provider / responder doubles
// ---------------------------------------------------------------------------

pub struct ScriptedProvider {
    results: Mutex<VecDeque<Result<Vec<RawAlert>, ProviderError>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Hold each call for `delay` so tests can pile callers onto one flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_batch(&self, batch: Vec<RawAlert>) {
        self.results.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_error(&self, error: ProviderError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertProvider for ScriptedProvider {
    async fn fetch_alerts(&self, _scope: &str) -> Result<Vec<RawAlert>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub struct ScriptedResponder {
    replies: Mutex<VecDeque<Result<String, ResponderError>>>,
    contexts: Mutex<Vec<Vec<Turn>>>,
    delay: Option<Duration>,
}

impl ScriptedResponder {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            contexts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn push_error(&self, error: ResponderError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Context windows captured from every call, in call order.
    pub fn contexts(&self) -> Vec<Vec<Turn>> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertResponder for ScriptedResponder {
    async fn respond(&self, turns: &[Turn]) -> Result<String, ResponderError> {
        self.contexts.lock().unwrap().push(turns.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Understood.".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn raw_alert(message: &str, timestamp: &str) -> RawAlert {
    RawAlert {
        message: Some(message.to_string()),
        timestamp: Some(timestamp.to_string()),
        ..Default::default()
    }
}

pub fn stored_alert(alert_id: &str, message: &str) -> AlertRecord {
    let mut alert = AlertRecord::new(alert_id, message);
    alert.dataset_version = "seed".to_string();
    alert
}

pub fn stored_alert_refreshed_at(
    alert_id: &str,
    message: &str,
    last_refreshed: DateTime<Utc>,
) -> AlertRecord {
    let mut alert = stored_alert(alert_id, message);
    alert.freshness = Some(FreshnessStamp { last_refreshed });
    alert
}
