use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unimarket_core::{Entity, NotificationId, UserId};

/// One delivered notification. Append-only; never mutated after delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Notification {
    type Id = NotificationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Persisted queue record: one per recipient, entries most-recent-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationQueue {
    pub user_id: UserId,
    pub entries: Vec<Notification>,
}
