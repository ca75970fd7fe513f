use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::timeout;

use aidagent_llm::{AlertProvider, ProviderError};
use aidagent_persist::AlertStore;
use aidagent_types::{AlertRecord, FreshnessStamp, RawAlert, GLOBAL_SCOPE};

use crate::config::RefreshConfig;
use crate::error::AlertError;
use crate::flight::FlightMap;
use crate::staleness::StalenessPolicy;

/// The refresh state machine for the shared alert dataset.
///
/// Reads reconcile freshness before returning: stale data triggers a
/// provider fetch and an atomic replace, a healthy cache is served as-is,
/// and a failing provider degrades to the previous dataset instead of
/// failing the read. At most one fetch per scope is in flight at a time;
/// callers that queue behind it reuse its outcome.
pub struct AlertRefreshOrchestrator {
    store: Arc<dyn AlertStore>,
    provider: Arc<dyn AlertProvider>,
    policy: StalenessPolicy,
    config: RefreshConfig,
    flights: FlightMap,
}

impl AlertRefreshOrchestrator {
    pub fn new(
        store: Arc<dyn AlertStore>,
        provider: Arc<dyn AlertProvider>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            store,
            provider,
            policy: StalenessPolicy::new(config.ttl),
            config,
            flights: FlightMap::new(),
        }
    }

    /// Return the current alert set, refreshing it first when the staleness
    /// policy demands it. Never fails because of the provider; only store
    /// read failures propagate.
    pub async fn get_alerts(
        &self,
        scope: Option<&str>,
        force: bool,
    ) -> Result<Vec<AlertRecord>, AlertError> {
        let scope = scope.unwrap_or(GLOBAL_SCOPE);

        let current = self.store.list_current().await?;
        // An empty store is a cold start no matter what the metadata says.
        let last_refreshed = if current.is_empty() {
            None
        } else {
            self.store.freshness().await?.and_then(|m| m.last_refreshed)
        };

        if !self
            .policy
            .should_refresh(last_refreshed, scope, force, Utc::now())
        {
            return Ok(current);
        }

        let flight = self.flights.entry(scope);
        let observed = flight.generation();
        let _gate = flight.acquire().await;
        if flight.generation() != observed {
            // An attempt completed while we queued; reuse its outcome,
            // whichever way it went.
            return Ok(self.store.list_current().await?);
        }

        match self.fetch_batch(scope).await {
            Ok(batch) => {
                let now = Utc::now();
                let records = ingest(batch, now);
                tracing::info!(scope, count = records.len(), "replacing alert dataset");
                if let Err(e) = self.store.replace_all(records, now).await {
                    // The version pointer only flips on success, so the
                    // prior dataset is still authoritative; serve it.
                    tracing::error!(scope, error = %e, "alert replace failed, keeping previous dataset");
                }
            }
            Err(e) => {
                tracing::warn!(scope, error = %e, "alert provider failed, serving cached dataset");
            }
        }
        flight.complete();

        Ok(self.store.list_current().await?)
    }

    /// Single-entity staleness check: re-query the provider for one alert
    /// and merge the returned fields into the stored record.
    pub async fn refresh_one(&self, alert_id: &str) -> Result<AlertRecord, AlertError> {
        let alert = self
            .store
            .find_alert(alert_id)
            .await?
            .ok_or_else(|| AlertError::NotFound(alert_id.to_string()))?;

        let last_refreshed = alert.freshness.map(|f| f.last_refreshed);
        if !self
            .policy
            .should_refresh(last_refreshed, GLOBAL_SCOPE, false, Utc::now())
        {
            return Ok(alert);
        }

        let flight = self.flights.entry(alert_id);
        let observed = flight.generation();
        let _gate = flight.acquire().await;
        if flight.generation() != observed {
            let refreshed = self
                .store
                .find_alert(alert_id)
                .await?
                .ok_or_else(|| AlertError::NotFound(alert_id.to_string()))?;
            return Ok(refreshed);
        }

        let result = self.requery_one(alert).await;
        flight.complete();
        result
    }

    async fn requery_one(&self, mut alert: AlertRecord) -> Result<AlertRecord, AlertError> {
        let fetched = self.fetch_batch(&alert.alert_id).await;
        match fetched {
            Ok(batch) => {
                let Some(raw) = batch.into_iter().next() else {
                    tracing::debug!(alert_id = %alert.alert_id, "provider returned no update for alert");
                    return Ok(alert);
                };

                let now = Utc::now();
                // Last-write-wins merge of the refreshable fields.
                if let Some(message) = raw.message.filter(|m| !m.trim().is_empty()) {
                    alert.message = message;
                }
                if raw.location.is_some() {
                    alert.location = raw.location;
                }
                alert.timestamp = now;
                alert.freshness = Some(FreshnessStamp {
                    last_refreshed: now,
                });

                match self.store.save_refreshed(&alert).await {
                    Ok(()) => Ok(alert),
                    Err(e) => {
                        tracing::error!(alert_id = %alert.alert_id, error = %e, "failed to persist refreshed alert");
                        // Hand back whatever is actually persisted.
                        let persisted = self.store.find_alert(&alert.alert_id).await?;
                        Ok(persisted.unwrap_or(alert))
                    }
                }
            }
            Err(e) => {
                tracing::warn!(alert_id = %alert.alert_id, error = %e, "alert provider failed, serving cached record");
                Ok(alert)
            }
        }
    }

    async fn fetch_batch(&self, scope: &str) -> Result<Vec<RawAlert>, ProviderError> {
        match timeout(self.config.provider_timeout, self.provider.fetch_alerts(scope)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Unavailable(format!(
                "timed out after {:?}",
                self.config.provider_timeout
            ))),
        }
    }
}

/// Validate a raw batch and order it newest first; unusable records are
/// dropped and logged.
fn ingest(batch: Vec<RawAlert>, now: DateTime<Utc>) -> Vec<AlertRecord> {
    let mut records: Vec<AlertRecord> = batch
        .into_iter()
        .filter_map(|raw| {
            let record = raw.into_record(now);
            if record.is_none() {
                tracing::warn!("dropping provider record with no message text");
            }
            record
        })
        .collect();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}
