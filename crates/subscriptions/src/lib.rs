//! Subscriptions module (favorites, watchlist, view history) and the
//! price-change fan-out they feed.

pub mod registry;

pub use registry::{HISTORY_LIMIT, SubscriptionRegistry};
