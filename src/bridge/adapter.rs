//! Channel adapter over the host's single message channel.
//!
//! `Bridge` wraps the raw transmit primitive and the inbound entry point:
//! - `send()` serializes `{type, data}` and hands it to the host
//! - `on_message()` registers a listener for every inbound envelope
//! - `deliver()` / `emit()` are called by the host runtime when a message arrives
//!
//! Nothing raised on either side of the channel crosses this boundary.
//! Transmit failures are logged and dropped; a panicking listener is logged
//! and the remaining listeners still run.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

use log::{debug, error, warn};
use serde::Serialize;
use serde_json::Value;

use super::envelope::{self, Envelope};
use super::transport::Transmit;
use crate::error::{BridgeResult, lock_recovering};

/// Callback invoked with `(type, data)` for each inbound envelope.
pub type MessageListener = Arc<dyn Fn(&str, &Value) + Send + Sync>;

pub struct Bridge {
    transport: Box<dyn Transmit>,
    listeners: Mutex<Vec<MessageListener>>,
    trace_envelopes: bool,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("listeners", &self.listener_count())
            .field("trace_envelopes", &self.trace_envelopes)
            .finish_non_exhaustive()
    }
}

impl Bridge {
    pub(crate) fn new(transport: Box<dyn Transmit>, trace_envelopes: bool) -> Self {
        Self {
            transport,
            listeners: Mutex::new(Vec::new()),
            trace_envelopes,
        }
    }

    /// Fire-and-forget send of `{type: kind, data}` to the host.
    ///
    /// Serialization and transmit failures are logged, never returned: the
    /// channel has no synchronous failure signal for the caller.
    pub fn send<T: Serialize + ?Sized>(&self, kind: &str, data: &T) {
        if let Err(e) = self.try_send(kind, data) {
            error!(
                target: "ipc_bridge::adapter",
                "Failed to send '{}': {}",
                kind,
                e
            );
        }
    }

    fn try_send<T: Serialize + ?Sized>(&self, kind: &str, data: &T) -> BridgeResult<()> {
        let wire = envelope::encode(kind, data)?;
        self.transport.transmit(wire)?;
        Ok(())
    }

    /// Register a listener for every inbound envelope.
    ///
    /// Listeners fire in registration order. There is no removal.
    pub fn on_message<F>(&self, listener: F)
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        lock_recovering(self.listeners.lock(), "Bridge::on_message").push(Arc::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        lock_recovering(self.listeners.lock(), "Bridge::listener_count").len()
    }

    /// Raw inbound entry point: decode a wire string and emit it.
    ///
    /// Malformed input is logged and dropped.
    pub fn deliver(&self, raw: &str) {
        match Envelope::decode(raw) {
            Ok(envelope) => self.emit(envelope),
            Err(e) => {
                warn!(
                    target: "ipc_bridge::adapter",
                    "Dropping undecodable inbound message: {}",
                    e
                );
            }
        }
    }

    /// Decoded inbound entry point: invoke every listener with `(type, data)`.
    pub fn emit(&self, envelope: Envelope) {
        if self.trace_envelopes {
            debug!(
                target: "ipc_bridge::adapter",
                "IPC message received: type={} data={}",
                envelope.kind,
                envelope.data
            );
        }

        // Snapshot so listeners may register further listeners without deadlock.
        let listeners = lock_recovering(self.listeners.lock(), "Bridge::emit").clone();

        for listener in listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                listener(&envelope.kind, &envelope.data)
            }));
            if outcome.is_err() {
                error!(
                    target: "ipc_bridge::adapter",
                    "Message listener panicked while handling '{}'",
                    envelope.kind
                );
            }
        }
    }
}
