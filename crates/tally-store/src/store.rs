use tally_model::Counter;

use crate::error::StoreResult;

/// Durable map from counter key to integer value.
///
/// The trait exposes exactly one operation. Every mutation of a counter
/// goes through it; nothing in the workspace reads a value and writes it
/// back, so linearizability rests entirely on how an implementation makes
/// this single call atomic.
pub trait CounterStore: Send + Sync {
    /// Atomically add 1 to the counter for `key` and return the record
    /// as it stands after the increment.
    ///
    /// A key never seen before is created with an implicit value of 0
    /// first, so its first increment returns 1. Concurrent callers on the
    /// same key each observe a distinct value; no value is skipped and
    /// none is handed out twice.
    ///
    /// Blank keys are rejected before the backend is touched. A backend
    /// failure means the counter did not advance; the operation is never
    /// partially applied and never retried here.
    fn increment_and_get(&self, key: &str) -> StoreResult<Counter>;
}
