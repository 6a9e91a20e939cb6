use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unimarket_core::{Entity, ItemId, ThreadId, UserId};

/// One message in a thread's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender_id: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// A conversation scoped to one item and one buyer-seller pair.
///
/// Threads are never deleted; when the item is removed the `item_id` keeps
/// pointing at a missing record and readers must tolerate that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageThread {
    pub id: ThreadId,
    pub item_id: ItemId,
    /// Initiator first, item owner second. Matching is unordered.
    pub participants: [UserId; 2],
    pub messages: Vec<Message>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for MessageThread {
    type Id = ThreadId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl MessageThread {
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.participants.contains(&user_id)
    }

    /// Unordered match on (item, pair).
    pub fn is_between(&self, item_id: ItemId, a: UserId, b: UserId) -> bool {
        self.item_id == item_id && self.is_participant(a) && self.is_participant(b)
    }
}
