use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unimarket_core::{Entity, UserId};

/// Campus profile attached to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub university: String,
    pub faculty: String,
    pub department: String,
    pub grade: String,
    pub bio: String,
    pub agreed_terms: bool,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique across the store.
    pub email: String,
    /// Opaque; the engine never interprets it.
    pub credential: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
