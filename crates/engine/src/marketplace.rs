use std::sync::Arc;

use unimarket_accounts::{AccountService, Profile, User};
use unimarket_catalog::{CatalogService, Item, ItemDraft, ItemPatch, SearchQuery};
use unimarket_core::{DomainError, DomainResult, ItemId, OrderId, ThreadId, UserId};
use unimarket_messaging::{MessageThread, MessagingService};
use unimarket_notifications::{Notification, Notifier};
use unimarket_orders::{Order, OrderEngine};
use unimarket_store::EntityStore;
use unimarket_subscriptions::SubscriptionRegistry;

/// The composed engine: one store handle, one service per component, with
/// the subscription registry wired in as the catalog's price-change
/// listener.
///
/// The presentation layer resolves the current actor and enforces
/// owner/participant authorization before calling in.
pub struct Marketplace {
    accounts: AccountService,
    catalog: CatalogService,
    registry: Arc<SubscriptionRegistry>,
    orders: OrderEngine,
    messaging: MessagingService,
    notifier: Arc<Notifier>,
}

impl Marketplace {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        let notifier = Arc::new(Notifier::new(store.clone()));
        let registry = Arc::new(SubscriptionRegistry::new(store.clone(), notifier.clone()));

        let mut catalog = CatalogService::new(store.clone());
        catalog.subscribe(registry.clone());

        Self {
            accounts: AccountService::new(store.clone()),
            catalog,
            registry,
            orders: OrderEngine::new(store.clone(), notifier.clone()),
            messaging: MessagingService::new(store),
            notifier,
        }
    }

    // ---- accounts ----

    pub fn register_user(
        &self,
        email: &str,
        credential: &str,
        profile: Profile,
    ) -> DomainResult<User> {
        self.accounts.register(email, credential, profile)
    }

    pub fn update_profile(&self, user_id: UserId, profile: Profile) -> DomainResult<User> {
        self.accounts.update_profile(user_id, profile)
    }

    pub fn delete_account(&self, user_id: UserId) -> DomainResult<()> {
        self.accounts.delete_account(user_id)
    }

    pub fn get_user(&self, user_id: UserId) -> DomainResult<Option<User>> {
        self.accounts.get(user_id)
    }

    pub fn find_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.accounts.find_by_email(email)
    }

    // ---- catalog ----

    pub fn create_item(&self, owner_id: UserId, draft: ItemDraft) -> DomainResult<Item> {
        self.catalog.create(owner_id, draft)
    }

    /// Edit a listing. While a pending order references the item, its status
    /// belongs to the order engine and a status edit is rejected here.
    pub fn update_item(
        &self,
        item_id: ItemId,
        actor_id: UserId,
        patch: ItemPatch,
    ) -> DomainResult<Item> {
        if let Some(target) = patch.status {
            let current = self
                .catalog
                .get(item_id)?
                .ok_or(DomainError::not_found("item"))?;
            if target != current.status && self.orders.has_open_order(item_id)? {
                return Err(DomainError::conflict(
                    "item status is managed by its open order",
                ));
            }
        }
        self.catalog.update(item_id, actor_id, patch)
    }

    pub fn remove_item(&self, item_id: ItemId) -> DomainResult<()> {
        self.catalog.remove(item_id)
    }

    pub fn search_items(&self, query: &SearchQuery) -> DomainResult<Vec<Item>> {
        self.catalog.search(query)
    }

    pub fn get_item(&self, item_id: ItemId) -> DomainResult<Option<Item>> {
        self.catalog.get(item_id)
    }

    pub fn list_items_by_owner(&self, owner_id: UserId) -> DomainResult<Vec<Item>> {
        self.catalog.list_by_owner(owner_id)
    }

    /// The detail-view flow: count the view and, for a known viewer, record
    /// it in their history.
    pub fn view_item(&self, item_id: ItemId, viewer: Option<UserId>) -> DomainResult<Item> {
        let item = self.catalog.record_view(item_id)?;
        if let Some(viewer) = viewer {
            self.registry.record_history(viewer, item_id)?;
        }
        Ok(item)
    }

    // ---- subscriptions ----

    pub fn toggle_favorite(&self, user_id: UserId, item_id: ItemId) -> DomainResult<bool> {
        self.registry.toggle_favorite(user_id, item_id)
    }

    pub fn toggle_watch(&self, user_id: UserId, item_id: ItemId) -> DomainResult<bool> {
        self.registry.toggle_watch(user_id, item_id)
    }

    pub fn favorites(&self, user_id: UserId) -> DomainResult<Vec<ItemId>> {
        self.registry.favorites(user_id)
    }

    pub fn watchlist(&self, user_id: UserId) -> DomainResult<Vec<ItemId>> {
        self.registry.watchlist(user_id)
    }

    pub fn history(&self, user_id: UserId) -> DomainResult<Vec<ItemId>> {
        self.registry.history(user_id)
    }

    pub fn clear_history(&self, user_id: UserId) -> DomainResult<()> {
        self.registry.clear_history(user_id)
    }

    // ---- orders ----

    pub fn place_order(&self, item_id: ItemId, buyer_id: UserId) -> DomainResult<Order> {
        self.orders.place(item_id, buyer_id)
    }

    pub fn complete_order(&self, order_id: OrderId) -> DomainResult<Order> {
        self.orders.complete(order_id)
    }

    pub fn cancel_order(&self, order_id: OrderId) -> DomainResult<Order> {
        self.orders.cancel(order_id)
    }

    pub fn list_orders_for_user(&self, user_id: UserId) -> DomainResult<Vec<Order>> {
        self.orders.list_for_user(user_id)
    }

    // ---- messaging ----

    pub fn open_thread(&self, item_id: ItemId, initiator_id: UserId) -> DomainResult<MessageThread> {
        self.messaging.open_or_create_thread(item_id, initiator_id)
    }

    pub fn send_message(
        &self,
        thread_id: ThreadId,
        sender_id: UserId,
        text: &str,
    ) -> DomainResult<MessageThread> {
        self.messaging.append_message(thread_id, sender_id, text)
    }

    pub fn get_thread(&self, thread_id: ThreadId) -> DomainResult<Option<MessageThread>> {
        self.messaging.get(thread_id)
    }

    pub fn list_threads_for_user(&self, user_id: UserId) -> DomainResult<Vec<MessageThread>> {
        self.messaging.list_for_user(user_id)
    }

    // ---- notifications ----

    pub fn get_notifications_for_user(
        &self,
        user_id: UserId,
        limit: Option<usize>,
    ) -> DomainResult<Vec<Notification>> {
        self.notifier.for_user(user_id, limit)
    }
}
