//! Catalog domain module (listings and search).
//!
//! The catalog owns the `Item` entity: creation, edits, view counting,
//! removal, and snapshot search. Price edits cross into other components
//! through the `ItemEventListener` seam, invoked synchronously inside the
//! triggering mutation.

pub mod events;
pub mod item;
pub mod search;
pub mod service;

pub use events::{ItemEventListener, ItemPriceChanged};
pub use item::{
    Item, ItemCategory, ItemCondition, ItemDraft, ItemPatch, ItemStatus, RequirementLevel,
    TextbookInfo,
};
pub use search::{SearchQuery, SortKey};
pub use service::CatalogService;
