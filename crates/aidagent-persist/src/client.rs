use mongodb::Client;

use crate::error::{Result, StoreError};
use crate::repositories::{MongoAlertRepository, MongoChatSessionRepository};

/// Facade bundling the Mongo repositories behind one connection.
pub struct PersistClient {
    alert_repo: MongoAlertRepository,
    chat_repo: MongoChatSessionRepository,
}

impl PersistClient {
    pub fn builder() -> PersistClientBuilder {
        PersistClientBuilder::new()
    }

    pub async fn new(mongodb_uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            alert_repo: MongoAlertRepository::new(&client, db_name),
            chat_repo: MongoChatSessionRepository::new(&client, db_name),
        })
    }

    pub fn alerts(&self) -> &MongoAlertRepository {
        &self.alert_repo
    }

    pub fn chats(&self) -> &MongoChatSessionRepository {
        &self.chat_repo
    }
}

pub struct PersistClientBuilder {
    mongodb_uri: Option<String>,
    database: Option<String>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            mongodb_uri: None,
            database: None,
        }
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub async fn build(self) -> Result<PersistClient> {
        let mongodb_uri = self
            .mongodb_uri
            .ok_or_else(|| StoreError::Internal("mongodb_uri is required".to_string()))?;
        let database = self
            .database
            .ok_or_else(|| StoreError::Internal("database is required".to_string()))?;

        PersistClient::new(&mongodb_uri, &database).await
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
