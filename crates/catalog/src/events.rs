use chrono::{DateTime, Utc};

use unimarket_core::{DomainResult, ItemId};

/// Emitted when an edit changes a listing's price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPriceChanged {
    pub item_id: ItemId,
    pub title: String,
    pub old_price: u64,
    pub new_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Consumer of catalog mutations.
///
/// Listeners run synchronously inside the mutation that produced the event,
/// before it commits, so cross-entity effects (watcher notifications) land
/// in the same logical operation rather than a later scan. A listener error
/// fails the whole operation with nothing persisted.
pub trait ItemEventListener: Send + Sync {
    fn on_price_changed(&self, event: &ItemPriceChanged) -> DomainResult<()>;
}
