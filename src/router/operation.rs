//! Typed contracts for the pre-agreed message kinds.
//!
//! Each logical operation between the application and the host is declared
//! once as a zero-sized type implementing one of these traits, which pins its
//! wire type names and payload shapes together.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Request/response pair: send `KIND`, await the next `RESPONSE_KIND`.
pub trait Request {
    const KIND: &'static str;
    const RESPONSE_KIND: &'static str;
    type Params: Serialize + ?Sized;
    type Response: DeserializeOwned;
}

/// Fire-and-forget message with no reply.
pub trait Notification {
    const KIND: &'static str;
    type Params: Serialize + ?Sized;
}

/// Host-pushed event stream.
pub trait Topic {
    const KIND: &'static str;
    type Payload: DeserializeOwned;
}
