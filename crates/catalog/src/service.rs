use chrono::Utc;
use std::sync::Arc;

use unimarket_core::{DomainError, DomainResult, ItemId, UserId};
use unimarket_store::{EntityStore, collections, load_typed, save_typed};

use crate::events::{ItemEventListener, ItemPriceChanged};
use crate::item::{Item, ItemDraft, ItemPatch};
use crate::search::{SearchQuery, filter_and_sort};

/// Listing lifecycle service over the entity store.
///
/// New listings are prepended so the stored order doubles as
/// newest-first insertion order.
pub struct CatalogService {
    store: Arc<dyn EntityStore>,
    listeners: Vec<Arc<dyn ItemEventListener>>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for catalog mutations. Wiring-time only.
    pub fn subscribe(&mut self, listener: Arc<dyn ItemEventListener>) {
        self.listeners.push(listener);
    }

    pub fn create(&self, owner_id: UserId, draft: ItemDraft) -> DomainResult<Item> {
        draft.validate()?;

        let item = draft.into_item(ItemId::new(), owner_id, Utc::now());
        let mut items = self.load_items()?;
        items.insert(0, item.clone());
        self.save_items(&items)?;

        tracing::debug!(item_id = %item.id, owner_id = %owner_id, "listing created");
        Ok(item)
    }

    /// Edit a listing. Ownership is the caller's responsibility; `actor_id`
    /// is recorded for diagnostics only.
    ///
    /// A price change invokes every registered listener before the edit is
    /// committed, so watcher fan-out lands inside this operation and a
    /// listener failure leaves the stored listing untouched.
    pub fn update(&self, item_id: ItemId, actor_id: UserId, patch: ItemPatch) -> DomainResult<Item> {
        let mut items = self.load_items()?;
        let slot = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(DomainError::not_found("item"))?;

        let old_price = slot.price;
        let mut edited = slot.clone();
        patch.apply_to(&mut edited, Utc::now());
        edited.validate()?;

        if edited.price != old_price {
            let event = ItemPriceChanged {
                item_id,
                title: edited.title.clone(),
                old_price,
                new_price: edited.price,
                occurred_at: edited.updated_at,
            };
            for listener in &self.listeners {
                listener.on_price_changed(&event)?;
            }
        }

        *slot = edited.clone();
        self.save_items(&items)?;

        tracing::debug!(item_id = %item_id, actor_id = %actor_id, "listing updated");
        Ok(edited)
    }

    /// Hard delete. Orders and threads referencing the item keep their ids
    /// and resolve the lookup as missing afterward.
    pub fn remove(&self, item_id: ItemId) -> DomainResult<()> {
        let mut items = self.load_items()?;
        let before = items.len();
        items.retain(|i| i.id != item_id);
        if items.len() == before {
            return Err(DomainError::not_found("item"));
        }
        self.save_items(&items)?;

        tracing::debug!(item_id = %item_id, "listing removed");
        Ok(())
    }

    /// Increment the view counter. Actor-independent.
    pub fn record_view(&self, item_id: ItemId) -> DomainResult<Item> {
        let mut items = self.load_items()?;
        let slot = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(DomainError::not_found("item"))?;

        slot.views += 1;
        let viewed = slot.clone();
        self.save_items(&items)?;
        Ok(viewed)
    }

    /// Snapshot search; the result is detached from later mutations.
    pub fn search(&self, query: &SearchQuery) -> DomainResult<Vec<Item>> {
        Ok(filter_and_sort(self.load_items()?, query))
    }

    pub fn get(&self, item_id: ItemId) -> DomainResult<Option<Item>> {
        Ok(self.load_items()?.into_iter().find(|i| i.id == item_id))
    }

    pub fn list_by_owner(&self, owner_id: UserId) -> DomainResult<Vec<Item>> {
        Ok(self
            .load_items()?
            .into_iter()
            .filter(|i| i.owner_id == owner_id)
            .collect())
    }

    fn load_items(&self) -> DomainResult<Vec<Item>> {
        Ok(load_typed(self.store.as_ref(), collections::ITEMS)?)
    }

    fn save_items(&self, items: &[Item]) -> DomainResult<()> {
        Ok(save_typed(self.store.as_ref(), collections::ITEMS, items)?)
    }
}
