use chrono::Utc;
use std::sync::Arc;

use unimarket_core::{DomainResult, NotificationId, UserId};
use unimarket_store::{EntityStore, collections, load_typed, save_typed};

use crate::notification::{Notification, NotificationQueue};

/// Pure fan-out: the same text becomes one independent notification per
/// recipient. No deduplication, no read state; bounding is the reader's.
pub struct Notifier {
    store: Arc<dyn EntityStore>,
}

impl Notifier {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn deliver(&self, user_ids: &[UserId], text: &str) -> DomainResult<()> {
        if user_ids.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let mut queues = self.load_queues()?;

        for &user_id in user_ids {
            let notification = Notification {
                id: NotificationId::new(),
                recipient_id: user_id,
                text: text.to_string(),
                created_at: now,
            };

            match queues.iter_mut().find(|q| q.user_id == user_id) {
                Some(queue) => queue.entries.insert(0, notification),
                None => queues.push(NotificationQueue {
                    user_id,
                    entries: vec![notification],
                }),
            }
        }

        self.save_queues(&queues)?;
        tracing::debug!(recipients = user_ids.len(), "notifications delivered");
        Ok(())
    }

    /// Most-recent-first prefix of the user's queue; `limit` bounds it.
    pub fn for_user(&self, user_id: UserId, limit: Option<usize>) -> DomainResult<Vec<Notification>> {
        let queues = self.load_queues()?;
        let mut entries = queues
            .into_iter()
            .find(|q| q.user_id == user_id)
            .map(|q| q.entries)
            .unwrap_or_default();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    fn load_queues(&self) -> DomainResult<Vec<NotificationQueue>> {
        Ok(load_typed(self.store.as_ref(), collections::NOTIFICATIONS)?)
    }

    fn save_queues(&self, queues: &[NotificationQueue]) -> DomainResult<()> {
        Ok(save_typed(self.store.as_ref(), collections::NOTIFICATIONS, queues)?)
    }
}
