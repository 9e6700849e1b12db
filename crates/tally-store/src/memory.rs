use std::collections::HashMap;
use std::sync::Mutex;

use tally_model::Counter;

use crate::error::{StoreError, StoreResult};

/// In-memory [`CounterStore`](crate::CounterStore) backed by a mutex-guarded map.
///
/// The mutex is the explicit per-key mutual-exclusion layer: a plain map
/// has no atomic read-modify-write of its own, so every increment holds
/// the lock for the whole bump. Nothing survives a process restart; meant
/// for tests and demos, not durability.
#[derive(Default, Debug)]
pub struct MemoryStore {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl crate::CounterStore for MemoryStore {
    fn increment_and_get(&self, key: &str) -> StoreResult<Counter> {
        if key.trim().is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let mut counters = self
            .counters
            .lock()
            .map_err(|_| StoreError::Backend("counter map mutex poisoned".to_string()))?;

        let value = counters.entry(key.to_string()).or_insert(0);
        *value += 1;

        Ok(Counter::new(key, *value))
    }
}
