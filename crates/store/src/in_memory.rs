use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::store::{EntityStore, StoreError};

/// In-memory entity store.
///
/// Backs tests and the demo wiring. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    collections: RwLock<HashMap<String, Vec<JsonValue>>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn load(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    fn save(&self, collection: &str, records: Vec<JsonValue>) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        collections.insert(collection.to_string(), records);
        Ok(())
    }
}
