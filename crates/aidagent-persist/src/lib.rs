pub mod client;
pub mod error;
pub mod repositories;
pub mod traits;

pub use client::{PersistClient, PersistClientBuilder};
pub use error::StoreError;
pub use repositories::{MongoAlertRepository, MongoChatSessionRepository};
pub use traits::{AlertStore, ChatSessionStore};
