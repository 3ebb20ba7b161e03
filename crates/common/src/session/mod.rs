//! Session token ownership and expiry signalling
//!
//! Exactly one bearer token is live at a time. The [`SessionManager`] is its
//! sole writer; durable persistence goes through the [`TokenStore`] trait so
//! hosts can choose where the single slot lives.

mod manager;
mod store;

pub use manager::{SessionEvent, SessionManager};
pub use store::{MemoryTokenStore, TokenStore};
