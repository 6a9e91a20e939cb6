//! Abstract entity-store boundary.
//!
//! Every component persists through this crate's `EntityStore` contract:
//! whole collections of JSON records, loaded and saved as one unit. The
//! store makes no transactional promises; callers read-modify-write a full
//! collection per logical operation.

pub mod collections;
pub mod in_memory;
pub mod store;

pub use in_memory::InMemoryEntityStore;
pub use store::{EntityStore, StoreError, load_typed, save_typed};
