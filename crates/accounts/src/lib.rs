//! Accounts module (registration, profiles, account removal).
//!
//! Credentials are stored opaque and never validated here; resolving the
//! current actor is the presentation layer's job.

pub mod service;
pub mod user;

pub use service::AccountService;
pub use user::{Profile, User};
