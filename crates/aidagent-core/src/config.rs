use std::time::Duration;

/// Tuning for the alert refresh orchestrator.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Maximum age of the cached dataset before a refresh is mandatory.
    pub ttl: chrono::Duration,
    /// Upper bound on one provider call; a timeout counts as a provider
    /// failure.
    pub provider_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            ttl: chrono::Duration::hours(24),
            provider_timeout: Duration::from_secs(30),
        }
    }
}

/// Tuning for the chat session manager.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// How many recent messages are sent to the responder. Bounds the
    /// context window only; the stored history is never truncated.
    pub context_window: usize,
    pub responder_timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_window: 5,
            responder_timeout: Duration::from_secs(30),
        }
    }
}
