//! Channel adapter over the host's message channel.
//!
//! # Components
//!
//! - `Envelope`: the `{type, data}` wire unit
//! - `Transmit`: the host's raw outbound primitive
//! - `Bridge`: typed send plus fan-out of inbound envelopes to listeners
//! - `BridgeContext`: process-scoped, initialize-once home of the `Bridge`
//! - `spawn_inbound_task`: optional tokio task feeding queued raw messages in

mod adapter;
mod context;
mod envelope;
mod pump;
mod transport;

pub use adapter::{Bridge, MessageListener};
pub use context::BridgeContext;
pub use envelope::{Envelope, encode};
pub use pump::{InboundTaskHandle, spawn_inbound_task};
pub use transport::{QueueTransmit, Transmit};
