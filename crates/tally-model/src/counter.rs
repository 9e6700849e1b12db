use serde::{Deserialize, Serialize};

/// A named counter and its current value.
///
/// This is the record the increment endpoint returns after a successful
/// bump: the key that was incremented and the value it now holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    /// Counter name.
    pub key: String,

    /// Value after the most recent increment.
    pub value: i64,
}

impl Counter {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self { key: key.into(), value }
    }
}
