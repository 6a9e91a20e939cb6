use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

use unimarket_core::DomainError;

/// Entity store operation error.
///
/// These are infrastructure failures, distinct from domain errors. Services
/// convert them at their boundary via the `From` impl below.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record serialization failed: {0}")]
    Serialization(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::storage(err.to_string())
    }
}

/// Persistent mapping from collection name to an ordered record sequence.
///
/// This is the engine's sole I/O boundary. Records are JSON values so the
/// contract stays decoupled from any one component's types; the typed
/// helpers below handle the serde round-trip.
///
/// Contract:
/// - `load` of a collection that was never saved yields an empty sequence.
/// - `save` replaces the whole collection; record order is preserved.
/// - No transactions. Each logical operation must read-modify-write every
///   collection it touches before returning.
pub trait EntityStore: Send + Sync {
    fn load(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError>;

    fn save(&self, collection: &str, records: Vec<JsonValue>) -> Result<(), StoreError>;
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    fn load(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError> {
        (**self).load(collection)
    }

    fn save(&self, collection: &str, records: Vec<JsonValue>) -> Result<(), StoreError> {
        (**self).save(collection, records)
    }
}

/// Load a collection and deserialize every record.
pub fn load_typed<T: DeserializeOwned>(
    store: &dyn EntityStore,
    collection: &str,
) -> Result<Vec<T>, StoreError> {
    store
        .load(collection)?
        .into_iter()
        .map(|record| {
            serde_json::from_value(record).map_err(|e| {
                StoreError::Serialization(format!("{collection}: {e}"))
            })
        })
        .collect()
}

/// Serialize records and replace the collection.
pub fn save_typed<T: Serialize>(
    store: &dyn EntityStore,
    collection: &str,
    records: &[T],
) -> Result<(), StoreError> {
    let records = records
        .iter()
        .map(|record| {
            serde_json::to_value(record).map_err(|e| {
                StoreError::Serialization(format!("{collection}: {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    store.save(collection, records)
}
