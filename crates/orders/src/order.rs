use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unimarket_core::{Entity, ItemId, OrderId, UserId};

/// Order status lifecycle.
///
/// `pending -> completed` and `pending -> canceled` are the only
/// transitions; terminal states are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Canceled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// A buyer-seller transaction tied to exactly one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub item_id: ItemId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Order {
    pub fn involves(&self, user_id: UserId) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
    }

    #[test]
    fn involves_matches_both_parties() {
        let order = Order {
            id: OrderId::new(),
            item_id: ItemId::new(),
            buyer_id: UserId::new(),
            seller_id: UserId::new(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        assert!(order.involves(order.buyer_id));
        assert!(order.involves(order.seller_id));
        assert!(!order.involves(UserId::new()));
    }
}
