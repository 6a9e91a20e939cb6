use chrono::Utc;
use std::sync::Arc;

use unimarket_catalog::Item;
use unimarket_core::{DomainError, DomainResult, ItemId, ThreadId, UserId};
use unimarket_store::{EntityStore, collections, load_typed, save_typed};

use crate::thread::{Message, MessageThread};

/// Thread lifecycle and the append-only message log.
pub struct MessagingService {
    store: Arc<dyn EntityStore>,
}

impl MessagingService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Find or lazily create the thread between the initiator and the item's
    /// owner. Contacting yourself about your own item is rejected.
    pub fn open_or_create_thread(
        &self,
        item_id: ItemId,
        initiator_id: UserId,
    ) -> DomainResult<MessageThread> {
        let items: Vec<Item> = load_typed(self.store.as_ref(), collections::ITEMS)?;
        let item = items
            .iter()
            .find(|i| i.id == item_id)
            .ok_or(DomainError::not_found("item"))?;

        if item.owner_id == initiator_id {
            return Err(DomainError::conflict("cannot message yourself"));
        }

        let mut threads = self.load_threads()?;
        if let Some(existing) = threads
            .iter()
            .find(|t| t.is_between(item_id, initiator_id, item.owner_id))
        {
            return Ok(existing.clone());
        }

        let thread = MessageThread {
            id: ThreadId::new(),
            item_id,
            participants: [initiator_id, item.owner_id],
            messages: Vec::new(),
            updated_at: Utc::now(),
        };
        threads.push(thread.clone());
        self.save_threads(&threads)?;

        tracing::debug!(thread_id = %thread.id, item_id = %item_id, "thread created");
        Ok(thread)
    }

    /// Append to the log and bump `updated_at` (inbox ordering key).
    ///
    /// Resolving the current actor and checking that the sender belongs to
    /// the thread is the caller's responsibility.
    pub fn append_message(
        &self,
        thread_id: ThreadId,
        sender_id: UserId,
        text: &str,
    ) -> DomainResult<MessageThread> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("message text cannot be empty"));
        }

        let mut threads = self.load_threads()?;
        let thread = threads
            .iter_mut()
            .find(|t| t.id == thread_id)
            .ok_or(DomainError::not_found("thread"))?;

        let now = Utc::now();
        thread.messages.push(Message {
            sender_id,
            text: text.to_string(),
            sent_at: now,
        });
        thread.updated_at = now;
        let updated = thread.clone();

        self.save_threads(&threads)?;
        Ok(updated)
    }

    pub fn get(&self, thread_id: ThreadId) -> DomainResult<Option<MessageThread>> {
        Ok(self.load_threads()?.into_iter().find(|t| t.id == thread_id))
    }

    /// The user's inbox, most recently active first.
    pub fn list_for_user(&self, user_id: UserId) -> DomainResult<Vec<MessageThread>> {
        let mut threads: Vec<MessageThread> = self
            .load_threads()?
            .into_iter()
            .filter(|t| t.is_participant(user_id))
            .collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(threads)
    }

    fn load_threads(&self) -> DomainResult<Vec<MessageThread>> {
        Ok(load_typed(self.store.as_ref(), collections::MESSAGES)?)
    }

    fn save_threads(&self, threads: &[MessageThread]) -> DomainResult<()> {
        Ok(save_typed(self.store.as_ref(), collections::MESSAGES, threads)?)
    }
}
