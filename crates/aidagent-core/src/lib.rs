pub mod chat;
pub mod config;
pub mod error;
pub mod flight;
pub mod refresh;
pub mod staleness;

pub use chat::ChatSessionManager;
pub use config::{ChatConfig, RefreshConfig};
pub use error::{AlertError, ChatError};
pub use refresh::AlertRefreshOrchestrator;
pub use staleness::StalenessPolicy;
