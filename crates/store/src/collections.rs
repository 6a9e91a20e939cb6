//! Collection names shared by all components.
//!
//! Map-shaped collections (favorites, watchlist, history, messages,
//! notifications) persist as one record per key so every collection is an
//! ordered record sequence under the same contract.

pub const USERS: &str = "users";
pub const ITEMS: &str = "items";
pub const ORDERS: &str = "orders";
pub const FAVORITES: &str = "favorites";
pub const WATCHLIST: &str = "watchlist";
pub const HISTORY: &str = "history";
pub const MESSAGES: &str = "messages";
pub const NOTIFICATIONS: &str = "notifications";
