use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single emergency alert as persisted and served.
///
/// Records are owned by the alert store: they are created either by an
/// explicit create call or by the refresh orchestrator's replace step, and
/// individual-field updates never touch the freshness stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub alert_id: String,
    pub message: String,
    /// "City, Country" label when known.
    pub location: Option<String>,
    pub related_request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Per-record freshness, set when the record was last re-queried.
    pub freshness: Option<FreshnessStamp>,
    #[serde(default)]
    pub aid_available: Vec<AidOffer>,
    pub missing_persons_reported: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub details: Vec<String>,
    /// Tag of the dataset generation this record belongs to. Readers only
    /// see records whose tag matches the current version pointer.
    #[serde(default)]
    pub dataset_version: String,
}

fn default_source() -> String {
    "Unknown".to_string()
}

impl AlertRecord {
    pub fn new(alert_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            alert_id: alert_id.into(),
            message: message.into(),
            location: None,
            related_request_id: None,
            timestamp: Utc::now(),
            freshness: None,
            aid_available: Vec::new(),
            missing_persons_reported: None,
            source: default_source(),
            details: Vec::new(),
            dataset_version: String::new(),
        }
    }
}

/// Embedded per-record freshness sub-record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FreshnessStamp {
    pub last_refreshed: DateTime<Utc>,
}

impl FreshnessStamp {
    pub fn now() -> Self {
        Self {
            last_refreshed: Utc::now(),
        }
    }
}

/// One aid-offer entry attached to an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AidOffer {
    pub kind: String,
    pub location_detail: String,
    pub helpline_number: Option<String>,
}

/// The singleton freshness-metadata document for the global dataset.
///
/// Holds the version pointer the replace step flips and the last refresh
/// time the staleness policy reads. Mutated only by the refresh
/// orchestrator after a successful replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshnessMetadata {
    #[serde(rename = "_id")]
    pub id: String,
    pub current_version: String,
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl FreshnessMetadata {
    pub const SINGLETON_ID: &'static str = "global";
}

/// Partial update applied by PUT-style edits. Only the provided fields are
/// modified; the freshness stamp and dataset version are never affected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertFieldUpdate {
    pub message: Option<String>,
    pub location: Option<String>,
    pub related_request_id: Option<String>,
    pub missing_persons_reported: Option<String>,
    pub source: Option<String>,
    pub details: Option<Vec<String>>,
    pub aid_available: Option<Vec<AidOffer>>,
}

impl AlertFieldUpdate {
    pub fn is_empty(&self) -> bool {
        self.message.is_none()
            && self.location.is_none()
            && self.related_request_id.is_none()
            && self.missing_persons_reported.is_none()
            && self.source.is_none()
            && self.details.is_none()
            && self.aid_available.is_none()
    }
}
