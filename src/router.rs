//! Correlation router over the bridge's inbound stream.
//!
//! Turns the single untyped channel into:
//! - one-shot request/response calls (`Router::request`, `Router::call`)
//! - fire-and-forget sends (`Router::send`, `Router::notify`)
//! - persistent topic subscriptions (`Router::subscribe`, `Router::subscribe_to`)

mod correlation;
mod operation;
mod pending;
mod subscribers;
mod waiters;

pub use correlation::Router;
pub use operation::{Notification, Request, Topic};
pub use pending::PendingReply;
pub use subscribers::Subscriber;
