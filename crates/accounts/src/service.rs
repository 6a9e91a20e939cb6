use chrono::Utc;
use std::sync::Arc;

use unimarket_catalog::Item;
use unimarket_core::{DomainError, DomainResult, UserId};
use unimarket_store::{EntityStore, collections, load_typed, save_typed};

use crate::user::{Profile, User};

const MIN_CREDENTIAL_CHARS: usize = 8;

/// Account lifecycle service.
pub struct AccountService {
    store: Arc<dyn EntityStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub fn register(
        &self,
        email: &str,
        credential: &str,
        profile: Profile,
    ) -> DomainResult<User> {
        let email = email.trim();
        if !looks_like_email(email) {
            return Err(DomainError::validation("malformed email address"));
        }
        if credential.chars().count() < MIN_CREDENTIAL_CHARS {
            return Err(DomainError::validation(format!(
                "credential must be at least {MIN_CREDENTIAL_CHARS} characters"
            )));
        }

        let mut users = self.load_users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(DomainError::conflict("email is already registered"));
        }

        let user = User {
            id: UserId::new(),
            email: email.to_string(),
            credential: credential.to_string(),
            profile,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        self.save_users(&users)?;

        tracing::info!(user_id = %user.id, "account registered");
        Ok(user)
    }

    pub fn update_profile(&self, user_id: UserId, profile: Profile) -> DomainResult<User> {
        let mut users = self.load_users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(DomainError::not_found("user"))?;

        user.profile = profile;
        let updated = user.clone();
        self.save_users(&users)?;
        Ok(updated)
    }

    /// Self-initiated deletion. Removes the account and every listing the
    /// user owns; orders and threads keep their ids and resolve the user or
    /// item as missing afterward.
    ///
    /// The item cascade commits first: if the user removal then fails, the
    /// account is still intact and the deletion can be retried.
    pub fn delete_account(&self, user_id: UserId) -> DomainResult<()> {
        let mut users = self.load_users()?;
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(DomainError::not_found("user"));
        }

        let mut items: Vec<Item> = load_typed(self.store.as_ref(), collections::ITEMS)?;
        items.retain(|i| i.owner_id != user_id);

        save_typed(self.store.as_ref(), collections::ITEMS, &items)?;
        self.save_users(&users)?;

        tracing::info!(user_id = %user_id, "account deleted");
        Ok(())
    }

    pub fn get(&self, user_id: UserId) -> DomainResult<Option<User>> {
        Ok(self.load_users()?.into_iter().find(|u| u.id == user_id))
    }

    pub fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self.load_users()?.into_iter().find(|u| u.email == email))
    }

    fn load_users(&self) -> DomainResult<Vec<User>> {
        Ok(load_typed(self.store.as_ref(), collections::USERS)?)
    }

    fn save_users(&self, users: &[User]) -> DomainResult<()> {
        Ok(save_typed(self.store.as_ref(), collections::USERS, users)?)
    }
}

/// Shape check only: something before '@', and a dot somewhere after it.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
