use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::{AidOffer, AlertRecord, FreshnessStamp};

/// Raw alert object as the external data provider emits it.
///
/// The provider gives no schema guarantee, so every field is optional and
/// unknown keys are ignored. `type` is accepted as an alias for `message`
/// because the upstream prompt asks for a crisis `type` while older payloads
/// carried a `message` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAlert {
    pub alert_id: Option<String>,
    #[serde(alias = "type")]
    pub message: Option<String>,
    pub location: Option<String>,
    pub related_request_id: Option<String>,
    pub timestamp: Option<String>,
    pub source: Option<String>,
    pub details: Vec<String>,
    pub aid_available: Vec<RawAidOffer>,
    pub missing_persons_reported: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAidOffer {
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub location_detail: Option<String>,
    pub helpline_number: Option<String>,
}

impl RawAlert {
    /// Validate and convert into a persisted record.
    ///
    /// Returns `None` for records with no usable message text; the caller is
    /// expected to drop them. Missing identifiers are generated, unparseable
    /// timestamps fall back to `now`, and the freshness stamp is set to the
    /// ingestion time.
    pub fn into_record(self, now: DateTime<Utc>) -> Option<AlertRecord> {
        let message = self.message.filter(|m| !m.trim().is_empty())?;

        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(parse_provider_timestamp)
            .unwrap_or(now);

        Some(AlertRecord {
            alert_id: self
                .alert_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            message,
            location: self.location,
            related_request_id: self.related_request_id,
            timestamp,
            freshness: Some(FreshnessStamp {
                last_refreshed: now,
            }),
            aid_available: self
                .aid_available
                .into_iter()
                .filter_map(RawAidOffer::into_offer)
                .collect(),
            missing_persons_reported: self.missing_persons_reported,
            source: self
                .source
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            details: self.details,
            dataset_version: String::new(),
        })
    }
}

impl RawAidOffer {
    fn into_offer(self) -> Option<AidOffer> {
        let kind = self.kind.filter(|k| !k.trim().is_empty())?;
        Some(AidOffer {
            kind,
            location_detail: self.location_detail.unwrap_or_default(),
            // the provider writes the literal string "None" for absent numbers
            helpline_number: self
                .helpline_number
                .filter(|n| !n.trim().is_empty() && n != "None"),
        })
    }
}

fn parse_provider_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
