//! Store Adapter: opaque JSON documents keyed by name.
//!
//! The bookmark feature keeps its whole group collection under one key; both
//! features share one settings record under [`SETTINGS_KEY`], patched field by
//! field so one feature never clobbers the other's preference.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde_json::{Map, Value};

use crate::types::errors::StoreError;
use crate::types::settings::SETTINGS_KEY;

/// Persistent key-value substrate consumed by the feature controllers.
pub trait StoreAdapter: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Reads one field of the shared settings record.
    fn read_setting(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .read(SETTINGS_KEY)?
            .and_then(|record| record.get(key).cloned()))
    }

    /// Merges `patch` into the shared settings record, keeping other fields.
    fn write_setting(&self, patch: Map<String, Value>) -> Result<(), StoreError> {
        let mut record = match self.read(SETTINGS_KEY)? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            record.insert(key, value);
        }
        self.write(SETTINGS_KEY, &Value::Object(record))
    }
}
