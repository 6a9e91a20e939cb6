use chrono::Utc;
use std::sync::Arc;

use unimarket_catalog::{Item, ItemStatus};
use unimarket_core::{DomainError, DomainResult, ItemId, OrderId, UserId};
use unimarket_notifications::Notifier;
use unimarket_store::{EntityStore, collections, load_typed, save_typed};

use crate::order::{Order, OrderStatus};

/// Order state machine over the entity store.
///
/// Every transition runs its checks and the party notifications first, then
/// commits the order and item updates as one unit; a failed delivery leaves
/// the stored state untouched.
pub struct OrderEngine {
    store: Arc<dyn EntityStore>,
    notifier: Arc<Notifier>,
}

impl OrderEngine {
    pub fn new(store: Arc<dyn EntityStore>, notifier: Arc<Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Start a purchase on an `available` item.
    ///
    /// The item status check doubles as the one-open-order-per-item
    /// invariant: a `pending` item can never accept a second order.
    pub fn place(&self, item_id: ItemId, buyer_id: UserId) -> DomainResult<Order> {
        let mut items = self.load_items()?;
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(DomainError::not_found("item"))?;

        if item.status != ItemStatus::Available {
            return Err(DomainError::conflict(format!(
                "item is {}, not available for purchase",
                item.status
            )));
        }
        if item.owner_id == buyer_id {
            return Err(DomainError::conflict("cannot purchase your own item"));
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            item_id,
            buyer_id,
            seller_id: item.owner_id,
            status: OrderStatus::Pending,
            created_at: now,
        };

        item.status = ItemStatus::Pending;
        item.updated_at = now;
        let title = item.title.clone();
        let seller_id = item.owner_id;

        let mut orders = self.load_orders()?;
        orders.insert(0, order.clone());

        self.notifier.deliver(
            &[buyer_id, seller_id],
            &format!("A transaction for \"{title}\" has started"),
        )?;

        self.save_items(&items)?;
        self.save_orders(&orders)?;

        tracing::info!(order_id = %order.id, item_id = %item_id, "order placed");
        Ok(order)
    }

    /// Finish a pending order; the item becomes `sold`.
    pub fn complete(&self, order_id: OrderId) -> DomainResult<Order> {
        self.transition(order_id, OrderStatus::Completed)
    }

    /// Abort a pending order; the item is released back to `available` if it
    /// is still `pending`.
    pub fn cancel(&self, order_id: OrderId) -> DomainResult<Order> {
        self.transition(order_id, OrderStatus::Canceled)
    }

    /// Whether a `pending` order currently references the item.
    pub fn has_open_order(&self, item_id: ItemId) -> DomainResult<bool> {
        Ok(self
            .load_orders()?
            .iter()
            .any(|o| o.item_id == item_id && o.status == OrderStatus::Pending))
    }

    /// Orders where the user is buyer or seller, newest first.
    pub fn list_for_user(&self, user_id: UserId) -> DomainResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .load_orders()?
            .into_iter()
            .filter(|o| o.involves(user_id))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub fn get(&self, order_id: OrderId) -> DomainResult<Option<Order>> {
        Ok(self.load_orders()?.into_iter().find(|o| o.id == order_id))
    }

    fn transition(&self, order_id: OrderId, target: OrderStatus) -> DomainResult<Order> {
        debug_assert!(target.is_terminal());

        let mut orders = self.load_orders()?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(DomainError::not_found("order"))?;

        if order.status.is_terminal() {
            return Err(DomainError::invalid_state(format!(
                "order is already {}",
                order.status
            )));
        }

        order.status = target;
        let updated = order.clone();

        // The item may have been deleted since the order opened; the
        // transition still lands, tolerating the missing reference.
        let mut items = self.load_items()?;
        let mut title = None;
        if let Some(item) = items.iter_mut().find(|i| i.id == updated.item_id) {
            let now = Utc::now();
            match target {
                OrderStatus::Completed => {
                    item.status = ItemStatus::Sold;
                    item.updated_at = now;
                }
                OrderStatus::Canceled | OrderStatus::Pending => {
                    if item.status == ItemStatus::Pending {
                        item.status = ItemStatus::Available;
                        item.updated_at = now;
                    }
                }
            }
            title = Some(item.title.clone());
        }

        let title = title.unwrap_or_else(|| "a removed listing".to_string());
        let text = match target {
            OrderStatus::Completed => format!("The transaction for \"{title}\" was completed"),
            _ => format!("The transaction for \"{title}\" was canceled"),
        };
        self.notifier
            .deliver(&[updated.buyer_id, updated.seller_id], &text)?;

        self.save_items(&items)?;
        self.save_orders(&orders)?;

        tracing::info!(order_id = %order_id, status = %target, "order transitioned");
        Ok(updated)
    }

    fn load_items(&self) -> DomainResult<Vec<Item>> {
        Ok(load_typed(self.store.as_ref(), collections::ITEMS)?)
    }

    fn save_items(&self, items: &[Item]) -> DomainResult<()> {
        Ok(save_typed(self.store.as_ref(), collections::ITEMS, items)?)
    }

    fn load_orders(&self) -> DomainResult<Vec<Order>> {
        Ok(load_typed(self.store.as_ref(), collections::ORDERS)?)
    }

    fn save_orders(&self, orders: &[Order]) -> DomainResult<()> {
        Ok(save_typed(self.store.as_ref(), collections::ORDERS, orders)?)
    }
}
