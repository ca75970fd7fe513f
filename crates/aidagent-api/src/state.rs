use std::sync::Arc;

use aidagent_core::{AlertRefreshOrchestrator, ChatSessionManager};
use aidagent_persist::AlertStore;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async
/// tasks. The CRUD routes go straight to the store; the read and chat
/// routes go through the state machines.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub alerts: Arc<dyn AlertStore>,
    pub orchestrator: Arc<AlertRefreshOrchestrator>,
    pub chat: Arc<ChatSessionManager>,
}

impl AppState {
    pub fn new(
        config: Config,
        alerts: Arc<dyn AlertStore>,
        orchestrator: AlertRefreshOrchestrator,
        chat: ChatSessionManager,
    ) -> Self {
        Self {
            config: Arc::new(config),
            alerts,
            orchestrator: Arc::new(orchestrator),
            chat: Arc::new(chat),
        }
    }
}
