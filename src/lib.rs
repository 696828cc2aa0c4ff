//! Request/response and publish/subscribe over a single host message channel.
//!
//! The host exposes one outbound primitive (`transmit` a string) and one
//! inbound entry point (`deliver` a string), both carrying `{type, data}`
//! envelopes. This crate layers on top of that:
//!
//! - [`bridge`]: the channel adapter and its process-scoped context
//! - [`router`]: one-shot requests, fire-and-forget sends and subscriptions
//! - [`client`]: the typed operations of the object-search host
//!
//! ```ignore
//! let context = Arc::new(BridgeContext::new());
//! let bridge = context.init(host_transmit);   // once, at startup
//! let client = IpcClient::new(Router::new(Arc::clone(&context)));
//!
//! // host runtime: bridge.deliver(raw) for every inbound message
//! let result = client.search_query("abc").await?;
//! ```

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod router;

pub use bridge::{Bridge, BridgeContext, Envelope, QueueTransmit, Transmit};
pub use client::IpcClient;
pub use config::{BridgeSettings, WaiterPolicy};
pub use error::{BridgeError, BridgeResult, TransmitError};
pub use router::{PendingReply, Router};
