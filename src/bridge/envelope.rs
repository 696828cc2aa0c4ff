//! Wire envelope for messages crossing the host boundary.
//!
//! Every message is a JSON object `{"type": <routing key>, "data": <payload>}`.
//! The adapter never looks inside `data`; decoding it is the business of
//! whoever registered for the `type`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed message unit `{type, data}`.
///
/// `data` defaults to `null` when the field is absent, which is how a host
/// encodes a message that carries no payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: T,
}

/// Borrowed form used on the send path to avoid cloning payloads.
#[derive(Serialize)]
struct OutboundEnvelope<'a, T: ?Sized> {
    #[serde(rename = "type")]
    kind: &'a str,
    data: &'a T,
}

impl<T> Envelope<T> {
    pub fn new(kind: impl Into<String>, data: T) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

impl Envelope<Value> {
    /// Decode a raw wire string into an envelope with an opaque payload.
    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Serialize `{type: kind, data}` to its wire form.
pub fn encode<T: Serialize + ?Sized>(kind: &str, data: &T) -> serde_json::Result<String> {
    serde_json::to_string(&OutboundEnvelope { kind, data })
}
