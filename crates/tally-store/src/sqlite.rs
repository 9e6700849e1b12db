use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{Connection, params};
use tally_model::Counter;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS counters (
    key   TEXT PRIMARY KEY,
    value INTEGER NOT NULL
) WITHOUT ROWID;
";

/// The upsert-and-bump as one statement, so the storage engine itself
/// guarantees atomicity. No caller ever reads a value and writes it back.
const INCREMENT: &str = "
INSERT INTO counters (key, value) VALUES (?1, 1)
ON CONFLICT(key) DO UPDATE SET value = value + 1
RETURNING value;
";

/// Durable [`CounterStore`](crate::CounterStore) backed by SQLite.
///
/// The connection lives behind `Arc<Mutex<_>>`; clones share it. The
/// increment is a single `INSERT .. ON CONFLICT .. RETURNING` statement,
/// so the per-key linearizability contract falls out of SQLite's own
/// write serialization rather than any logic here.
#[derive(Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let connection = Connection::open(path.as_ref())?;
        connection.pragma_update(None, "journal_mode", "WAL")?;
        debug!(path = %path.as_ref().display(), "opened counter store");
        Self::from_connection(connection)
    }

    /// Open a store that lives only as long as the process. Used by tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> StoreResult<Self> {
        connection.busy_timeout(Duration::from_secs(5))?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

impl crate::CounterStore for SqliteStore {
    fn increment_and_get(&self, key: &str) -> StoreResult<Counter> {
        if key.trim().is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let connection = self
            .connection
            .lock()
            .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))?;

        let value: i64 = connection.query_row(INCREMENT, params![key], |row| row.get(0))?;

        Ok(Counter::new(key, value))
    }
}
