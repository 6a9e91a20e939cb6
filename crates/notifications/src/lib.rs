//! Notification fan-out (durable per-user queues).

pub mod notification;
pub mod service;

pub use notification::Notification;
pub use service::Notifier;
