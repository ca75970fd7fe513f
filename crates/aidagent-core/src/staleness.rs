use chrono::{DateTime, Utc};

use aidagent_types::GLOBAL_SCOPE;

/// Pure refresh decision, evaluated in rule order:
///
/// 1. an explicit force always refreshes,
/// 2. a dataset that was never refreshed always refreshes,
/// 3. a location-scoped read always re-queries the provider for that scope
///    instead of trusting the global cache,
/// 4. otherwise refresh once the dataset is older than the TTL.
///
/// `now` is passed in so the policy stays clock-free and unit-testable
/// without I/O.
#[derive(Debug, Clone, Copy)]
pub struct StalenessPolicy {
    ttl: chrono::Duration,
}

impl StalenessPolicy {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self { ttl }
    }

    pub fn should_refresh(
        &self,
        last_refreshed: Option<DateTime<Utc>>,
        scope: &str,
        force: bool,
        now: DateTime<Utc>,
    ) -> bool {
        if force {
            return true;
        }
        let Some(last_refreshed) = last_refreshed else {
            return true;
        };
        if scope != GLOBAL_SCOPE {
            return true;
        }
        now - last_refreshed > self.ttl
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::new(chrono::Duration::hours(24))
    }
}
