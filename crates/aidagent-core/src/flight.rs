use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, MutexGuard};

/// Serialization state for one key (a refresh scope, an alert id, or a chat
/// session key).
///
/// The gate serializes work on the key. The generation counter is bumped
/// when an attempt completes, while the gate is still held: a caller that
/// recorded the generation before queueing and finds it changed after
/// acquiring knows an attempt ran while it waited, and must reuse that
/// attempt's outcome instead of starting its own.
pub struct Flight {
    gate: AsyncMutex<()>,
    generation: AtomicU64,
}

impl Flight {
    fn new() -> Self {
        Self {
            gate: AsyncMutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Mark an attempt as completed, successful or not.
    pub fn complete(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

/// Lazily grown map of per-key flights.
#[derive(Default)]
pub struct FlightMap {
    flights: Mutex<HashMap<String, Arc<Flight>>>,
}

impl FlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, key: &str) -> Arc<Flight> {
        let mut flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());
        flights
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Flight::new()))
            .clone()
    }
}
