//! Error handling types for ipc-bridge
//!
//! Only a few of these ever reach an application caller. Transport failures
//! are logged and swallowed at the adapter boundary; see [`crate::bridge::Bridge::send`].

use std::sync::{MutexGuard, PoisonError};
use thiserror::Error;

/// Failure reported by the host's raw `transmit` primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransmitError {
    /// The host side of the channel is gone
    #[error("host channel closed")]
    Closed,

    /// The host primitive raised; the reason is opaque to the adapter
    #[error("host transmit failed: {0}")]
    Host(String),
}

/// Comprehensive error type for bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The process-wide channel was used before it was initialized
    #[error("IPC bridge not ready")]
    NotReady,

    /// Outbound payload could not be serialized
    #[error("Failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),

    /// Host primitive failed while transmitting
    #[error(transparent)]
    Transmit(#[from] TransmitError),

    /// Inbound payload did not match the expected shape
    #[error("Failed to decode '{kind}' payload: {source}")]
    Decode {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// A pending reply can no longer be delivered
    #[error("Reply channel for '{kind}' closed")]
    Closed { kind: String },
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Create a decode error for the given envelope type
    pub fn decode(kind: impl Into<String>, source: serde_json::Error) -> Self {
        BridgeError::Decode {
            kind: kind.into(),
            source,
        }
    }

    /// Create a closed-reply error for the given envelope type
    pub fn closed(kind: impl Into<String>) -> Self {
        BridgeError::Closed { kind: kind.into() }
    }
}

/// Lock a mutex, recovering the guard if a previous holder panicked.
///
/// Listener code runs outside every lock, so a poisoned mutex here only means
/// a panic unwound through bookkeeping code; the protected maps stay coherent.
pub(crate) fn lock_recovering<'a, T>(
    result: Result<MutexGuard<'a, T>, PoisonError<MutexGuard<'a, T>>>,
    context: &str,
) -> MutexGuard<'a, T> {
    result.unwrap_or_else(|poisoned| {
        log::warn!(
            target: "ipc_bridge::lock_recovery",
            "Recovered from poisoned lock in {}",
            context
        );
        poisoned.into_inner()
    })
}
