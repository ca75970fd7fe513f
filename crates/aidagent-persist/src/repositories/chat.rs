use async_trait::async_trait;
use chrono::Utc;
use mongodb::{bson, bson::doc, Client, Collection};

use aidagent_types::{ChatMessage, ChatSession};

use crate::error::{Result, StoreError};
use crate::traits::ChatSessionStore;

#[derive(Clone)]
pub struct MongoChatSessionRepository {
    collection: Collection<ChatSession>,
}

impl MongoChatSessionRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("alert_chats");
        Self { collection }
    }
}

#[async_trait]
impl ChatSessionStore for MongoChatSessionRepository {
    async fn find_session(
        &self,
        alert_id: &str,
        participant_id: &str,
    ) -> Result<Option<ChatSession>> {
        let filter = doc! { "alert_id": alert_id, "participant_id": participant_id };
        Ok(self.collection.find_one(filter).await?)
    }

    async fn create_session(&self, alert_id: &str, participant_id: &str) -> Result<ChatSession> {
        let session = ChatSession::new(alert_id, participant_id);
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    /// Append via `$push` so concurrent writers cannot lose messages the way
    /// a read-modify-write of the whole document would.
    async fn append_message(
        &self,
        alert_id: &str,
        participant_id: &str,
        message: ChatMessage,
    ) -> Result<ChatSession> {
        let filter = doc! { "alert_id": alert_id, "participant_id": participant_id };
        let update = doc! {
            "$push": { "messages": bson::to_bson(&message)? },
            "$set": { "updated_at": bson::to_bson(&Utc::now())? },
        };

        self.collection
            .find_one_and_update(filter, update)
            .return_document(mongodb::options::ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                StoreError::SessionNotFound(ChatSession::key(alert_id, participant_id))
            })
    }
}
