use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson, bson::doc, Client, Collection};

use aidagent_types::{AlertFieldUpdate, AlertRecord, FreshnessMetadata};

use crate::error::Result;
use crate::traits::AlertStore;

/// Mongo-backed store for alert records and the freshness-metadata
/// singleton.
///
/// The atomic replace works on dataset versions: the new batch is inserted
/// under a fresh version tag, then `{current_version, last_refreshed}` is
/// flipped in the single metadata document. That one-document update is the
/// point where the new dataset becomes visible; superseded versions are
/// swept afterwards and are invisible to readers either way.
#[derive(Clone)]
pub struct MongoAlertRepository {
    alerts: Collection<AlertRecord>,
    meta: Collection<FreshnessMetadata>,
}

impl MongoAlertRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let db = client.database(db_name);
        Self {
            alerts: db.collection("alerts"),
            meta: db.collection("meta_info"),
        }
    }

    async fn current_version(&self) -> Result<Option<String>> {
        Ok(self.load_meta().await?.map(|m| m.current_version))
    }

    async fn load_meta(&self) -> Result<Option<FreshnessMetadata>> {
        let filter = doc! { "_id": FreshnessMetadata::SINGLETON_ID };
        Ok(self.meta.find_one(filter).await?)
    }
}

#[async_trait]
impl AlertStore for MongoAlertRepository {
    async fn list_current(&self) -> Result<Vec<AlertRecord>> {
        // Before the first refresh there is no version pointer and every
        // record (explicitly created ones included) is current.
        let filter = match self.current_version().await? {
            Some(version) => doc! { "dataset_version": version },
            None => doc! {},
        };

        let alerts = self
            .alerts
            .find(filter)
            .sort(doc! { "timestamp": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(alerts)
    }

    async fn find_alert(&self, alert_id: &str) -> Result<Option<AlertRecord>> {
        let filter = doc! { "alert_id": alert_id };
        Ok(self.alerts.find_one(filter).await?)
    }

    async fn insert_alert(&self, mut alert: AlertRecord) -> Result<AlertRecord> {
        // Tag with the current version so the record is visible alongside
        // the refreshed dataset.
        alert.dataset_version = self.current_version().await?.unwrap_or_default();
        self.alerts.insert_one(&alert).await?;
        Ok(alert)
    }

    async fn update_alert(
        &self,
        alert_id: &str,
        update: AlertFieldUpdate,
    ) -> Result<Option<AlertRecord>> {
        if update.is_empty() {
            return self.find_alert(alert_id).await;
        }

        let mut set = doc! {};
        if let Some(message) = &update.message {
            set.insert("message", message);
        }
        if let Some(location) = &update.location {
            set.insert("location", location);
        }
        if let Some(related_request_id) = &update.related_request_id {
            set.insert("related_request_id", related_request_id);
        }
        if let Some(missing) = &update.missing_persons_reported {
            set.insert("missing_persons_reported", missing);
        }
        if let Some(source) = &update.source {
            set.insert("source", source);
        }
        if let Some(details) = &update.details {
            set.insert("details", bson::to_bson(details)?);
        }
        if let Some(aid_available) = &update.aid_available {
            set.insert("aid_available", bson::to_bson(aid_available)?);
        }

        let updated = self
            .alerts
            .find_one_and_update(doc! { "alert_id": alert_id }, doc! { "$set": set })
            .return_document(mongodb::options::ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn delete_alert(&self, alert_id: &str) -> Result<bool> {
        let result = self.alerts.delete_one(doc! { "alert_id": alert_id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn replace_all(
        &self,
        mut records: Vec<AlertRecord>,
        refreshed_at: DateTime<Utc>,
    ) -> Result<()> {
        let version = uuid::Uuid::new_v4().to_string();
        for record in &mut records {
            record.dataset_version = version.clone();
        }

        // Invisible to readers until the pointer flips below. An insert
        // failure leaves the prior dataset authoritative.
        if !records.is_empty() {
            self.alerts.insert_many(&records).await?;
        }

        self.meta
            .update_one(
                doc! { "_id": FreshnessMetadata::SINGLETON_ID },
                doc! { "$set": {
                    "current_version": &version,
                    "last_refreshed": bson::to_bson(&refreshed_at)?,
                }},
            )
            .upsert(true)
            .await?;

        // Sweep superseded versions. A failure only delays cleanup.
        if let Err(e) = self
            .alerts
            .delete_many(doc! { "dataset_version": { "$ne": &version } })
            .await
        {
            tracing::warn!(error = %e, "failed to sweep superseded alert dataset");
        }

        Ok(())
    }

    async fn save_refreshed(&self, alert: &AlertRecord) -> Result<()> {
        self.alerts
            .update_one(
                doc! { "alert_id": &alert.alert_id },
                doc! { "$set": {
                    "message": &alert.message,
                    "location": bson::to_bson(&alert.location)?,
                    "timestamp": bson::to_bson(&alert.timestamp)?,
                    "freshness": bson::to_bson(&alert.freshness)?,
                }},
            )
            .await?;
        Ok(())
    }

    async fn freshness(&self) -> Result<Option<FreshnessMetadata>> {
        self.load_meta().await
    }
}
