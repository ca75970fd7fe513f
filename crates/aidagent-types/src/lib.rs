pub mod alert;
pub mod chat;
pub mod raw;

pub use alert::{AidOffer, AlertFieldUpdate, AlertRecord, FreshnessMetadata, FreshnessStamp};
pub use chat::{ChatMessage, ChatRole, ChatSession};
pub use raw::{RawAidOffer, RawAlert};

/// Scope name for the unfiltered alert set.
pub const GLOBAL_SCOPE: &str = "global";
