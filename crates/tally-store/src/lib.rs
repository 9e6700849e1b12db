mod error;
pub use error::{StoreError, StoreResult};

mod store;
pub use store::CounterStore;

mod memory;
pub use memory::MemoryStore;

mod sqlite;
pub use sqlite::SqliteStore;
