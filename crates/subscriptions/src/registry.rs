use serde::{Deserialize, Serialize};
use std::sync::Arc;

use unimarket_catalog::{ItemEventListener, ItemPriceChanged};
use unimarket_core::{DomainResult, ItemId, UserId};
use unimarket_notifications::Notifier;
use unimarket_store::{EntityStore, collections, load_typed, save_typed};

/// View history keeps at most this many item ids per user.
pub const HISTORY_LIMIT: usize = 100;

/// Persisted record shared by the favorites, watchlist, and history
/// collections: one ordered id list per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UserItemList {
    user_id: UserId,
    item_ids: Vec<ItemId>,
}

/// Per-user favorite/watch sets and view history.
///
/// Also the catalog's price-change consumer: a watched item's price edit
/// becomes one notification per watcher, delivered inside the edit.
pub struct SubscriptionRegistry {
    store: Arc<dyn EntityStore>,
    notifier: Arc<Notifier>,
}

impl SubscriptionRegistry {
    pub fn new(store: Arc<dyn EntityStore>, notifier: Arc<Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Flip favorite membership; returns whether the item is now favorited.
    pub fn toggle_favorite(&self, user_id: UserId, item_id: ItemId) -> DomainResult<bool> {
        self.toggle(collections::FAVORITES, user_id, item_id)
    }

    /// Flip watch membership; returns whether the item is now watched.
    pub fn toggle_watch(&self, user_id: UserId, item_id: ItemId) -> DomainResult<bool> {
        self.toggle(collections::WATCHLIST, user_id, item_id)
    }

    /// Prepend to the user's history, de-duplicated and bounded to
    /// `HISTORY_LIMIT` entries.
    pub fn record_history(&self, user_id: UserId, item_id: ItemId) -> DomainResult<()> {
        let mut lists = self.load(collections::HISTORY)?;
        let list = entry(&mut lists, user_id);
        list.item_ids.retain(|&id| id != item_id);
        list.item_ids.insert(0, item_id);
        list.item_ids.truncate(HISTORY_LIMIT);
        self.save(collections::HISTORY, &lists)
    }

    pub fn clear_history(&self, user_id: UserId) -> DomainResult<()> {
        let mut lists = self.load(collections::HISTORY)?;
        if let Some(list) = lists.iter_mut().find(|l| l.user_id == user_id) {
            list.item_ids.clear();
            self.save(collections::HISTORY, &lists)?;
        }
        Ok(())
    }

    /// Favorited ids, most recently added first.
    pub fn favorites(&self, user_id: UserId) -> DomainResult<Vec<ItemId>> {
        self.ids_for(collections::FAVORITES, user_id)
    }

    /// Watched ids, most recently added first.
    pub fn watchlist(&self, user_id: UserId) -> DomainResult<Vec<ItemId>> {
        self.ids_for(collections::WATCHLIST, user_id)
    }

    /// Viewed ids, most recent first.
    pub fn history(&self, user_id: UserId) -> DomainResult<Vec<ItemId>> {
        self.ids_for(collections::HISTORY, user_id)
    }

    /// Every user currently watching `item_id`.
    pub fn watchers_of(&self, item_id: ItemId) -> DomainResult<Vec<UserId>> {
        Ok(self
            .load(collections::WATCHLIST)?
            .into_iter()
            .filter(|l| l.item_ids.contains(&item_id))
            .map(|l| l.user_id)
            .collect())
    }

    fn toggle(&self, collection: &str, user_id: UserId, item_id: ItemId) -> DomainResult<bool> {
        let mut lists = self.load(collection)?;
        let list = entry(&mut lists, user_id);

        let now_member = if list.item_ids.contains(&item_id) {
            list.item_ids.retain(|&id| id != item_id);
            false
        } else {
            list.item_ids.insert(0, item_id);
            true
        };

        self.save(collection, &lists)?;
        Ok(now_member)
    }

    fn ids_for(&self, collection: &str, user_id: UserId) -> DomainResult<Vec<ItemId>> {
        Ok(self
            .load(collection)?
            .into_iter()
            .find(|l| l.user_id == user_id)
            .map(|l| l.item_ids)
            .unwrap_or_default())
    }

    fn load(&self, collection: &str) -> DomainResult<Vec<UserItemList>> {
        Ok(load_typed(self.store.as_ref(), collection)?)
    }

    fn save(&self, collection: &str, lists: &[UserItemList]) -> DomainResult<()> {
        Ok(save_typed(self.store.as_ref(), collection, lists)?)
    }
}

fn entry(lists: &mut Vec<UserItemList>, user_id: UserId) -> &mut UserItemList {
    if let Some(idx) = lists.iter().position(|l| l.user_id == user_id) {
        return &mut lists[idx];
    }
    lists.push(UserItemList {
        user_id,
        item_ids: Vec::new(),
    });
    let idx = lists.len() - 1;
    &mut lists[idx]
}

impl ItemEventListener for SubscriptionRegistry {
    fn on_price_changed(&self, event: &ItemPriceChanged) -> DomainResult<()> {
        let watchers = self.watchers_of(event.item_id)?;
        if watchers.is_empty() {
            return Ok(());
        }

        let text = format!(
            "Price for watched listing \"{}\" changed to {}",
            event.title, event.new_price
        );
        tracing::debug!(item_id = %event.item_id, watchers = watchers.len(), "price-change fan-out");
        self.notifier.deliver(&watchers, &text)
    }
}
